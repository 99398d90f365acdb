//! Remote store identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a target exchange in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreIdentifier {
    /// The collection (container) the exchange lives in.
    pub collection_id: String,
    /// The exchange itself.
    pub exchange_id: String,
    /// Optional display title.
    pub title: Option<String>,
}

impl StoreIdentifier {
    /// Creates a new store identifier.
    pub fn new(collection_id: impl Into<String>, exchange_id: impl Into<String>) -> Self {
        Self {
            collection_id: collection_id.into(),
            exchange_id: exchange_id.into(),
            title: None,
        }
    }

    /// Sets the display title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl fmt::Display for StoreIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection_id, self.exchange_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_display() {
        let id = StoreIdentifier::new("col-1", "exch-9");
        assert_eq!(id.to_string(), "col-1/exch-9");
    }
}
