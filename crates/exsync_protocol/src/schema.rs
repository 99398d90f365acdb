//! Schema documents and graph snapshots.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from schema document encoding and decoding.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document could not be encoded or decoded as JSON.
    #[error("schema codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// One asset as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Asset id.
    pub id: String,
    /// Canonical kind name (`Element`, `GeometryAsset`, ...).
    pub kind: String,
    /// Display name, if any.
    pub name: Option<String>,
    /// Display metadata, insertion-ordered.
    #[serde(default)]
    pub properties: IndexMap<String, String>,
    /// Remote locator of the uploaded payload, if any.
    pub binary_reference: Option<String>,
}

/// One relationship as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    /// Source asset id.
    pub from: String,
    /// Target asset id.
    pub to: String,
    /// Edge kind name (`Reference` or `Containment`).
    pub kind: String,
}

/// The full serialized structure of a graph.
///
/// Publication of this document is what makes assets visible and queryable
/// remotely; it always covers the complete asset and relationship set of the
/// graph, not only newly uploaded assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// All assets of the graph.
    pub assets: Vec<AssetRecord>,
    /// All relationships of the graph.
    pub relationships: Vec<RelationshipRecord>,
}

impl SchemaDocument {
    /// Encodes the document to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>, SchemaError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes a document from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, SchemaError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Returns true if the document describes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty() && self.relationships.is_empty()
    }
}

/// A fetched asset graph, as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Exchange the snapshot was taken from.
    pub exchange_id: String,
    /// Display title of the exchange.
    pub title: Option<String>,
    /// Revision the snapshot reflects.
    pub revision_id: String,
    /// Structure of the graph at that revision.
    pub schema: SchemaDocument,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> SchemaDocument {
        SchemaDocument {
            assets: vec![
                AssetRecord {
                    id: "wall-1".into(),
                    kind: "Element".into(),
                    name: Some("Wall".into()),
                    properties: IndexMap::from([("level".to_string(), "1".to_string())]),
                    binary_reference: None,
                },
                AssetRecord {
                    id: "geo-1".into(),
                    kind: "GeometryAsset".into(),
                    name: None,
                    properties: IndexMap::new(),
                    binary_reference: Some("store://blob/1".into()),
                },
            ],
            relationships: vec![RelationshipRecord {
                from: "wall-1".into(),
                to: "geo-1".into(),
                kind: "Containment".into(),
            }],
        }
    }

    #[test]
    fn schema_json_round_trip() {
        let doc = sample_document();
        let bytes = doc.to_json().unwrap();
        let decoded = SchemaDocument::from_json(&bytes).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn missing_properties_default_to_empty() {
        let json = br#"{"id":"a","kind":"Element","name":null,"binary_reference":null}"#;
        let record: AssetRecord = serde_json::from_slice(json).unwrap();
        assert!(record.properties.is_empty());
    }

    #[test]
    fn empty_document() {
        assert!(SchemaDocument::default().is_empty());
        assert!(!sample_document().is_empty());
    }
}
