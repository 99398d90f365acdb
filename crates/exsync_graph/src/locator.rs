//! Local payload locators.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Locates a geometry payload on the local side, before upload.
///
/// The synchronization engine treats payload contents as opaque bytes; this
/// type only says where those bytes come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadLocator {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// An in-memory buffer.
    Buffer(Vec<u8>),
}

impl PayloadLocator {
    /// Creates a file-backed locator.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Creates a buffer-backed locator.
    pub fn buffer(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Buffer(bytes.into())
    }

    /// Returns the payload size when it is known without I/O.
    #[must_use]
    pub fn known_len(&self) -> Option<usize> {
        match self {
            PayloadLocator::Path(_) => None,
            PayloadLocator::Buffer(bytes) => Some(bytes.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_length_is_known() {
        assert_eq!(PayloadLocator::buffer(vec![1, 2, 3]).known_len(), Some(3));
        assert_eq!(PayloadLocator::path("/tmp/mesh.bin").known_len(), None);
    }
}
