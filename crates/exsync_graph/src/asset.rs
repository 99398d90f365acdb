//! Asset nodes and their identifiers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an asset within a graph.
///
/// Asset ids are opaque strings. They are:
/// - Unique within a graph
/// - Stable across synchronization runs
/// - Never reused
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Creates an asset id from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a new random asset id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({})", self.0)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The kind of an asset node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// A design element (wall, beam, fixture, ...).
    Element,
    /// A geometry asset carrying an uploadable binary payload.
    Geometry,
    /// A design grouping asset.
    Design,
    /// An instance of another asset.
    Instance,
    /// Any other kind, identified by name.
    Other(String),
}

impl AssetKind {
    /// Returns the canonical type name for this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            AssetKind::Element => "Element",
            AssetKind::Geometry => "GeometryAsset",
            AssetKind::Design => "DesignAsset",
            AssetKind::Instance => "InstanceAsset",
            AssetKind::Other(name) => name,
        }
    }

    /// Parses a canonical type name back into a kind.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Element" => AssetKind::Element,
            "GeometryAsset" => AssetKind::Geometry,
            "DesignAsset" => AssetKind::Design,
            "InstanceAsset" => AssetKind::Instance,
            other => AssetKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronization status of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetStatus {
    /// Created client-side, payload work still pending.
    PendingLocal,
    /// Created client-side, ready for synchronization.
    CreatedLocal,
    /// Included in a successfully committed transaction.
    Synced,
}

impl AssetStatus {
    /// Returns true if the asset has not yet been synchronized.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, AssetStatus::PendingLocal | AssetStatus::CreatedLocal)
    }
}

/// An immutable pointer to an uploaded geometry payload.
///
/// Set once per asset after a successful upload. A re-upload produces a new
/// reference value, never a mutation of an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryReference {
    /// Remote locator for the uploaded payload.
    pub locator: String,
    /// Optional content checksum reported by the store.
    pub checksum: Option<String>,
}

impl BinaryReference {
    /// Creates a reference from a remote locator.
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
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

/// A node in the asset graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier within the graph.
    pub id: AssetId,
    /// Kind of the asset.
    pub kind: AssetKind,
    /// Display metadata, insertion-ordered.
    pub properties: IndexMap<String, String>,
    /// Synchronization status.
    pub status: AssetStatus,
    /// Revision assigned by the last successful transaction, if any.
    pub revision_id: Option<String>,
    /// Reference to the uploaded payload, if any.
    pub binary_reference: Option<BinaryReference>,
}

impl Asset {
    /// Creates a new local asset.
    pub fn new(id: AssetId, kind: AssetKind) -> Self {
        Self {
            id,
            kind,
            properties: IndexMap::new(),
            status: AssetStatus::CreatedLocal,
            revision_id: None,
            binary_reference: None,
        }
    }

    /// Returns the display name, taken from the `name` property.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").map(String::as_str)
    }

    /// Returns true if this asset is a geometry asset.
    #[must_use]
    pub fn is_geometry(&self) -> bool {
        self.kind == AssetKind::Geometry
    }

    /// Returns true if this asset carries geometry content, either by kind
    /// or through a linked binary reference.
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.is_geometry() || self.binary_reference.is_some()
    }
}
