//! # ExSync Engine
//!
//! Transactional synchronization of an asset graph with a remote, versioned
//! exchange store.
//!
//! This crate provides:
//! - The synchronization state machine (open → upload → publish → commit →
//!   poll → reconcile)
//! - A bounded concurrent upload pool with per-payload bookkeeping
//! - Transport abstraction over the remote store, including a mock and a
//!   gateway-backed implementation
//! - Retry with exponential backoff for retryable failures
//!
//! ## Architecture
//!
//! A caller populates an [`exsync_graph::AssetGraph`] and hands it to
//! [`SyncEngine::synchronize`] together with a store identifier. The engine
//! walks the phases in strict order; binary uploads within the upload phase
//! may run concurrently, phases never do. On success the graph's status,
//! revision and binary-reference fields are reconciled in place; on failure
//! the run reports a structured outcome naming the failing phase.
//!
//! ## Key Invariants
//!
//! - The pending-upload map is the only source of upload work; an empty map
//!   makes the upload phase a no-op
//! - Successful uploads are retained across failed runs, so a retried run
//!   only re-uploads the remainder
//! - Schema publication always covers the full asset and relationship set
//!   and runs even when nothing was uploaded
//! - A poll timeout is indeterminate: the transaction may have completed
//!   remotely, and the engine never pretends otherwise

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod credentials;
mod engine;
mod error;
mod gateway;
mod payload;
mod schema;
mod transaction;
mod transport;
mod uploader;

pub use config::{RetryConfig, SyncConfig};
pub use credentials::{Credential, CredentialSource, StaticCredentials};
pub use engine::{SyncEngine, SyncOutcome};
pub use error::{SyncError, SyncResult};
pub use gateway::{GatewayTransport, SdkNames};
pub use payload::{LocalPayloadSource, PayloadSource};
pub use schema::{document_from_graph, graph_from_snapshot};
pub use transaction::{SyncPhase, SyncTransaction};
pub use transport::{MockTransport, StoreTransport};
