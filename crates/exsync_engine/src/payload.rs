//! Geometry payload access.

use exsync_graph::PayloadLocator;

/// Resolves a local payload locator to opaque bytes.
///
/// The engine never inspects payload contents.
pub trait PayloadSource: Send + Sync {
    /// Reads the payload behind a locator.
    fn read(&self, locator: &PayloadLocator) -> Result<Vec<u8>, String>;
}

/// Reads buffers directly and paths from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct LocalPayloadSource;

impl LocalPayloadSource {
    /// Creates the source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PayloadSource for LocalPayloadSource {
    fn read(&self, locator: &PayloadLocator) -> Result<Vec<u8>, String> {
        match locator {
            PayloadLocator::Buffer(bytes) => Ok(bytes.clone()),
            PayloadLocator::Path(path) => {
                std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))
            }
        }
    }
}
