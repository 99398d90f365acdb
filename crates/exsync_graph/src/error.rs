//! Error types for graph operations.

use crate::asset::AssetId;
use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while building or mutating an asset graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An asset with the same id already exists in the graph.
    #[error("duplicate asset id: {0}")]
    DuplicateAsset(AssetId),

    /// The referenced asset does not exist in the graph.
    #[error("unknown asset: {0}")]
    UnknownAsset(AssetId),

    /// The operation requires a different asset kind.
    #[error("wrong asset kind for {id}: expected {expected}, found {found}")]
    WrongAssetKind {
        /// Asset the operation targeted.
        id: AssetId,
        /// Kind the operation requires.
        expected: String,
        /// Kind actually present.
        found: String,
    },

    /// The asset already carries a binary reference.
    #[error("asset {0} is already linked to an uploaded payload")]
    AlreadyLinked(AssetId),
}

impl GraphError {
    /// Creates a wrong-kind error.
    pub fn wrong_kind(id: AssetId, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::WrongAssetKind {
            id,
            expected: expected.into(),
            found: found.into(),
        }
    }
}
