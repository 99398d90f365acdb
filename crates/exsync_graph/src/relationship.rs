//! Directed relationships between assets.

use crate::asset::AssetId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a relationship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    /// A non-owning reference from one asset to another.
    Reference,
    /// A parent-to-child containment edge.
    Containment,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::Reference => f.write_str("Reference"),
            RelationshipKind::Containment => f.write_str("Containment"),
        }
    }
}

/// A directed, typed edge between two assets in the same graph.
///
/// The synchronization engine treats relationships as unordered facts, not
/// traversal order. The graph is not required to be acyclic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Source asset id.
    pub from: AssetId,
    /// Target asset id.
    pub to: AssetId,
    /// Kind of the edge.
    pub kind: RelationshipKind,
}

impl Relationship {
    /// Creates a new relationship.
    pub fn new(from: AssetId, to: AssetId, kind: RelationshipKind) -> Self {
        Self { from, to, kind }
    }

    /// Returns true if this is a containment edge.
    #[must_use]
    pub fn is_containment(&self) -> bool {
        self.kind == RelationshipKind::Containment
    }
}
