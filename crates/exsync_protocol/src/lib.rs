//! # ExSync Protocol
//!
//! Wire messages for talking to the remote exchange store.
//!
//! Each remote operation is a request/response pair. Responses carry a
//! `success` flag and an optional `error` message; payload fields are only
//! meaningful when `success` is true. The exact transport (HTTP, SDK calls
//! through the gateway, in-memory test double) is owned by the engine.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod messages;
mod schema;

pub use messages::{
    AbortRequest, AbortResponse, CommitRequest, CommitResponse, FetchGraphRequest,
    FetchGraphResponse, OpenTransactionRequest, OpenTransactionResponse, PollStatusRequest,
    PollStatusResponse, PublishSchemaRequest, PublishSchemaResponse, RemoteTransactionState,
    UploadBinaryRequest, UploadBinaryResponse,
};
pub use schema::{AssetRecord, GraphSnapshot, RelationshipRecord, SchemaDocument, SchemaError};
