//! Request/response messages for remote store operations.

use crate::schema::{GraphSnapshot, SchemaDocument};
use serde::{Deserialize, Serialize};

/// Opens a transaction against a target exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTransactionRequest {
    /// Collection containing the exchange.
    pub collection_id: String,
    /// Exchange to open the transaction against.
    pub exchange_id: String,
}

/// Response to [`OpenTransactionRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTransactionResponse {
    /// Whether the transaction was opened.
    pub success: bool,
    /// Error message if the open failed.
    pub error: Option<String>,
    /// Identifier of the opened transaction.
    pub transaction_id: Option<String>,
}

impl OpenTransactionResponse {
    /// Creates a successful response.
    pub fn success(transaction_id: impl Into<String>) -> Self {
        Self {
            success: true,
            error: None,
            transaction_id: Some(transaction_id.into()),
        }
    }

    /// Creates a failed response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            transaction_id: None,
        }
    }
}

/// Uploads one binary payload under an open transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadBinaryRequest {
    /// Transaction the upload belongs to.
    pub transaction_id: String,
    /// Asset the payload belongs to.
    pub asset_id: String,
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
}

/// Response to [`UploadBinaryRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadBinaryResponse {
    /// Whether the upload succeeded.
    pub success: bool,
    /// Error message if the upload failed.
    pub error: Option<String>,
    /// Remote locator for the stored payload.
    pub reference: Option<String>,
    /// Content checksum reported by the store.
    pub checksum: Option<String>,
}

impl UploadBinaryResponse {
    /// Creates a successful response.
    pub fn success(reference: impl Into<String>) -> Self {
        Self {
            success: true,
            error: None,
            reference: Some(reference.into()),
            checksum: None,
        }
    }

    /// Creates a failed response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            reference: None,
            checksum: None,
        }
    }

    /// Sets the content checksum.
    #[must_use]
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }
}

/// Publishes the schema (structure) of a graph under an open transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishSchemaRequest {
    /// Transaction the publication belongs to.
    pub transaction_id: String,
    /// Full structure of the graph being synchronized.
    pub schema: SchemaDocument,
}

/// Response to [`PublishSchemaRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishSchemaResponse {
    /// Whether the publication succeeded.
    pub success: bool,
    /// Error message if it failed.
    pub error: Option<String>,
}

impl PublishSchemaResponse {
    /// Creates a successful response.
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Creates a failed response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Asks the store to finalize a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
    /// Transaction to finalize.
    pub transaction_id: String,
}

/// Response to [`CommitRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResponse {
    /// Whether the commit was accepted.
    pub success: bool,
    /// Error message if it was rejected.
    pub error: Option<String>,
}

impl CommitResponse {
    /// Creates a successful response.
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Creates a failed response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Remote visibility state of a committed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteTransactionState {
    /// The commit has been accepted but its revision is not yet visible.
    Pending,
    /// The transaction's revision is visible.
    Committed,
    /// The store reports the transaction as failed.
    Failed,
}

/// Polls the status of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollStatusRequest {
    /// Transaction to poll.
    pub transaction_id: String,
}

/// Response to [`PollStatusRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollStatusResponse {
    /// Whether the poll itself succeeded.
    pub success: bool,
    /// Error message if the poll failed.
    pub error: Option<String>,
    /// Remote state of the transaction.
    pub state: RemoteTransactionState,
    /// Revision produced by the transaction, once visible.
    pub revision_id: Option<String>,
}

impl PollStatusResponse {
    /// Creates a response for a still-pending transaction.
    pub fn pending() -> Self {
        Self {
            success: true,
            error: None,
            state: RemoteTransactionState::Pending,
            revision_id: None,
        }
    }

    /// Creates a response for a visible, committed transaction.
    pub fn committed(revision_id: impl Into<String>) -> Self {
        Self {
            success: true,
            error: None,
            state: RemoteTransactionState::Committed,
            revision_id: Some(revision_id.into()),
        }
    }

    /// Creates a response for a remotely failed transaction.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            error: Some(message.into()),
            state: RemoteTransactionState::Failed,
            revision_id: None,
        }
    }

    /// Creates a response for a failed poll call.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            state: RemoteTransactionState::Pending,
            revision_id: None,
        }
    }
}

/// Aborts an open transaction so server-side resources are released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbortRequest {
    /// Transaction to abort.
    pub transaction_id: String,
}

/// Response to [`AbortRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbortResponse {
    /// Whether the abort was accepted.
    pub success: bool,
    /// Error message if it was rejected.
    pub error: Option<String>,
}

impl AbortResponse {
    /// Creates a successful response.
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Creates a failed response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Fetches the current asset graph of an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchGraphRequest {
    /// Collection containing the exchange.
    pub collection_id: String,
    /// Exchange to fetch.
    pub exchange_id: String,
}

/// Response to [`FetchGraphRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchGraphResponse {
    /// Whether the fetch succeeded.
    pub success: bool,
    /// Error message if it failed.
    pub error: Option<String>,
    /// Snapshot of the exchange's graph.
    pub snapshot: Option<GraphSnapshot>,
}

impl FetchGraphResponse {
    /// Creates a successful response.
    pub fn success(snapshot: GraphSnapshot) -> Self {
        Self {
            success: true,
            error: None,
            snapshot: Some(snapshot),
        }
    }

    /// Creates a failed response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            snapshot: None,
        }
    }
}
