//! Tree construction and queries.

use crate::node::ExchangeTreeNode;
use exsync_graph::AssetGraph;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// A read-only hierarchical view over a fetched asset graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExchangeTree {
    /// Designated root node id, if the graph had a root candidate.
    pub root_id: Option<String>,
    /// All nodes, keyed by id, in graph discovery order.
    pub nodes: IndexMap<String, ExchangeTreeNode>,
    /// Number of nodes whose type is exactly `Element`.
    pub element_count: usize,
    /// Number of nodes carrying geometry.
    pub geometry_count: usize,
    /// Exchange the tree was built from.
    pub exchange_id: Option<String>,
    /// Display title of the exchange.
    pub exchange_title: Option<String>,
}

impl ExchangeTree {
    /// Returns the root node.
    ///
    /// `None` when the root id is unset, empty, or not present in `nodes`.
    #[must_use]
    pub fn root(&self) -> Option<&ExchangeTreeNode> {
        let id = self.root_id.as_deref()?;
        if id.is_empty() {
            return None;
        }
        self.nodes.get(id)
    }

    /// Returns the children of a node, silently skipping ids that are not
    /// present in `nodes`.
    #[must_use]
    pub fn children(&self, id: &str) -> Vec<&ExchangeTreeNode> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        node.child_ids
            .iter()
            .filter_map(|child| self.nodes.get(child))
            .collect()
    }

    /// Returns all nodes carrying geometry, in node iteration order.
    #[must_use]
    pub fn geometry_nodes(&self) -> Vec<&ExchangeTreeNode> {
        self.nodes.values().filter(|n| n.has_geometry).collect()
    }

    /// Finds nodes by case-insensitive exact name match.
    ///
    /// Nodes without a name never match. An empty query matches nodes whose
    /// name is the empty string.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Vec<&ExchangeTreeNode> {
        let query = name.to_lowercase();
        self.nodes
            .values()
            .filter(|n| {
                n.name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase() == query)
            })
            .collect()
    }

    /// Returns nodes whose asset type is exactly `Element` (case-sensitive).
    #[must_use]
    pub fn elements(&self) -> Vec<&ExchangeTreeNode> {
        self.nodes
            .values()
            .filter(|n| n.asset_type == "Element")
            .collect()
    }

    /// Produces one display line per node via depth-first pre-order
    /// traversal from the root.
    ///
    /// Empty when the root is unset or absent. Invalid child ids are skipped
    /// without producing a line.
    #[must_use]
    pub fn to_display_list(&self) -> Vec<String> {
        let Some(root) = self.root() else {
            return Vec::new();
        };

        let mut lines = Vec::new();
        let mut visited = HashSet::new();
        self.display_into(&root.id, &mut visited, &mut lines);
        lines
    }

    fn display_into(&self, id: &str, visited: &mut HashSet<String>, lines: &mut Vec<String>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !visited.insert(id.to_string()) {
            return;
        }
        lines.push(node.display_line());
        for child in &node.child_ids {
            self.display_into(child, visited, lines);
        }
    }
}

/// Builds an [`ExchangeTree`] from a fetched asset graph.
#[derive(Debug, Default)]
pub struct TreeBuilder;

impl TreeBuilder {
    /// Walks the graph's containment relationships and assembles the
    /// projection.
    ///
    /// The first asset in graph iteration order with no incoming containment
    /// edge is designated the root.
    #[must_use]
    pub fn build(graph: &AssetGraph) -> ExchangeTree {
        let mut nodes: IndexMap<String, ExchangeTreeNode> = graph
            .assets()
            .map(|asset| {
                (
                    asset.id.as_str().to_string(),
                    ExchangeTreeNode {
                        id: asset.id.as_str().to_string(),
                        name: asset.name().map(str::to_string),
                        asset_type: asset.kind.as_str().to_string(),
                        parent_id: None,
                        child_ids: Vec::new(),
                        properties: asset.properties.clone(),
                        has_geometry: asset.has_geometry(),
                        depth: 0,
                    },
                )
            })
            .collect();

        for relationship in graph.relationships() {
            if !relationship.is_containment() {
                continue;
            }
            let from = relationship.from.as_str();
            let to = relationship.to.as_str();
            if !nodes.contains_key(from) || !nodes.contains_key(to) {
                continue;
            }
            // First incoming containment wins.
            if nodes[to].parent_id.is_some() {
                continue;
            }
            nodes[to].parent_id = Some(from.to_string());
            let child = to.to_string();
            nodes[from].child_ids.push(child);
        }

        let root_candidates: Vec<String> = nodes
            .values()
            .filter(|n| n.parent_id.is_none())
            .map(|n| n.id.clone())
            .collect();
        let root_id = root_candidates.first().cloned();

        // Depth: 0 at each root candidate, parent depth + 1 below.
        let mut visited = HashSet::new();
        for root in &root_candidates {
            let mut stack = vec![(root.clone(), 0usize)];
            while let Some((id, depth)) = stack.pop() {
                if !visited.insert(id.clone()) {
                    continue;
                }
                if let Some(node) = nodes.get_mut(&id) {
                    node.depth = depth;
                    for child in node.child_ids.clone() {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }

        let element_count = nodes.values().filter(|n| n.asset_type == "Element").count();
        let geometry_count = nodes.values().filter(|n| n.has_geometry).count();
        let (exchange_id, exchange_title) = match graph.identifier() {
            Some(id) => (Some(id.exchange_id.clone()), id.title.clone()),
            None => (None, None),
        };

        ExchangeTree {
            root_id,
            nodes,
            element_count,
            geometry_count,
            exchange_id,
            exchange_title,
        }
    }
}
