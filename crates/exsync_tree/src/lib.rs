//! # ExSync Tree Projection
//!
//! Read-only hierarchical view over a fetched asset graph.
//!
//! [`TreeBuilder::build`] walks a graph's containment relationships to
//! assign parents and children, designates a root, and denormalizes display
//! counters. The resulting [`ExchangeTree`] is immutable; rebuild it when
//! the underlying graph changes.
//!
//! All queries tolerate stale or partial graphs: missing child ids are
//! skipped, an absent root yields `None` or an empty listing, and `None`
//! names never match a search.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod node;
mod tree;

pub use node::ExchangeTreeNode;
pub use tree::{ExchangeTree, TreeBuilder};
