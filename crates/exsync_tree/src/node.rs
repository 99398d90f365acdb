//! Tree node type.

use indexmap::IndexMap;
use serde::Serialize;

/// One node of the projected tree.
///
/// Built once from a fetched asset graph; immutable thereafter except for
/// external rebuild.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeTreeNode {
    /// Asset id this node projects.
    pub id: String,
    /// Display name, from the asset's `name` property.
    pub name: Option<String>,
    /// Canonical asset type name.
    pub asset_type: String,
    /// Parent node id, if any.
    pub parent_id: Option<String>,
    /// Child node ids in discovery order.
    pub child_ids: Vec<String>,
    /// Display metadata.
    pub properties: IndexMap<String, String>,
    /// Whether the node carries geometry content.
    pub has_geometry: bool,
    /// Distance from the root (0 at a root).
    pub depth: usize,
}

impl ExchangeTreeNode {
    /// Formats one display line for this node: name, type, geometry marker.
    #[must_use]
    pub fn display_line(&self) -> String {
        let indent = "  ".repeat(self.depth);
        let name = self.name.as_deref().unwrap_or("");
        let suffix = if self.has_geometry { " [G]" } else { "" };
        format!("{indent}{name} ({}){suffix}", self.asset_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(depth: usize, has_geometry: bool) -> ExchangeTreeNode {
        ExchangeTreeNode {
            id: "n-1".into(),
            name: Some("Wall".into()),
            asset_type: "Element".into(),
            parent_id: None,
            child_ids: Vec::new(),
            properties: IndexMap::new(),
            has_geometry,
            depth,
        }
    }

    #[test]
    fn display_line_indents_two_spaces_per_depth() {
        assert_eq!(node(0, false).display_line(), "Wall (Element)");
        assert_eq!(node(2, false).display_line(), "    Wall (Element)");
    }

    #[test]
    fn display_line_marks_geometry() {
        assert_eq!(node(1, true).display_line(), "  Wall (Element) [G]");
    }
}
