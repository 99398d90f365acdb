//! Error types for the synchronization engine.

use exsync_graph::{AssetId, GraphError};
use thiserror::Error;

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during a synchronization run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyncError {
    /// The transaction could not be opened. Retryable.
    #[error("could not open transaction: {message}")]
    TransactionOpen {
        /// Reason reported by the store.
        message: String,
    },

    /// Some uploads succeeded and at least one failed. Retryable: a
    /// re-run skips the completed uploads automatically.
    #[error("{} of {} uploads failed", failed.len(), completed.len() + failed.len())]
    PartialUpload {
        /// Assets whose payload was uploaded and linked.
        completed: Vec<AssetId>,
        /// Assets whose upload failed, with the failure reason.
        failed: Vec<(AssetId, String)>,
    },

    /// Schema publication was rejected.
    #[error("schema publication failed: {message}")]
    SchemaPublish {
        /// Reason reported by the store.
        message: String,
    },

    /// The commit was rejected, or the store reports the transaction as
    /// failed.
    #[error("commit failed: {message}")]
    Commit {
        /// Reason reported by the store.
        message: String,
    },

    /// Polling exceeded the configured timeout.
    ///
    /// Indeterminate: the transaction may or may not have completed
    /// remotely. Never treated as guaranteed-failed.
    #[error("timed out waiting for the transaction revision (outcome indeterminate)")]
    Timeout,

    /// A required SDK capability could not be resolved.
    ///
    /// Fatal: signals an incompatible SDK version.
    #[error("incompatible exchange SDK: {name}")]
    Resolution {
        /// The missing capability.
        name: String,
    },

    /// Network or transport failure.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// Local graph bookkeeping failed.
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// A payload could not be read from its local locator.
    #[error("payload for {asset} unavailable: {message}")]
    Payload {
        /// Asset the payload belongs to.
        asset: AssetId,
        /// Reason the payload could not be read.
        message: String,
    },

    /// A bearer credential could not be acquired.
    #[error("credential acquisition failed: {0}")]
    Credential(String),

    /// The run was cancelled by the caller. The remote transaction's fate
    /// is indeterminate; no implicit rollback is attempted.
    #[error("synchronization cancelled")]
    Cancelled,

    /// The requested transition is not valid from the current phase.
    #[error("operation not valid in phase {phase}")]
    InvalidPhase {
        /// The phase the transaction was in.
        phase: String,
    },
}

impl SyncError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if re-running the synchronization may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::TransactionOpen { .. } => true,
            SyncError::PartialUpload { .. } => true,
            SyncError::Transport { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Returns true if the remote outcome is unknown.
    ///
    /// Indeterminate failures must not be retried blindly: the transaction
    /// may have committed remotely.
    #[must_use]
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, SyncError::Timeout | SyncError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability() {
        assert!(SyncError::TransactionOpen {
            message: "store unreachable".into()
        }
        .is_retryable());
        assert!(SyncError::transport_retryable("reset").is_retryable());
        assert!(!SyncError::transport_fatal("bad certificate").is_retryable());
        assert!(!SyncError::Timeout.is_retryable());
        assert!(!SyncError::Resolution {
            name: "Client.Commit".into()
        }
        .is_retryable());
    }

    #[test]
    fn indeterminate_outcomes() {
        assert!(SyncError::Timeout.is_indeterminate());
        assert!(SyncError::Cancelled.is_indeterminate());
        assert!(!SyncError::Commit {
            message: "rejected".into()
        }
        .is_indeterminate());
    }

    #[test]
    fn partial_upload_counts_in_message() {
        let err = SyncError::PartialUpload {
            completed: vec![AssetId::from("a")],
            failed: vec![
                (AssetId::from("b"), "io".into()),
                (AssetId::from("c"), "io".into()),
            ],
        };
        assert_eq!(err.to_string(), "2 of 3 uploads failed");
        assert!(err.is_retryable());
    }
}
