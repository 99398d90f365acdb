//! # ExSync Asset Graph
//!
//! In-memory model of a design asset graph destined for a remote, versioned
//! exchange store.
//!
//! This crate provides:
//! - Asset nodes (elements, geometry, design groupings, instances)
//! - Directed, typed relationships between assets
//! - The pending-upload map tracking geometry payloads not yet uploaded
//! - Store identifiers naming the remote exchange
//!
//! ## Lifecycle
//!
//! A graph is created empty (or rebuilt from a fetched snapshot), populated
//! by graph-building calls, then handed exclusively to the synchronization
//! engine for the duration of one run. The engine mutates `status`,
//! `revision_id` and `binary_reference` fields in place on success and
//! leaves the graph unchanged on failure.
//!
//! ## Key Invariants
//!
//! - Asset ids are unique within a graph
//! - Relationships only connect assets present in the same graph
//! - The pending-upload map is the single source of truth for what needs
//!   uploading; an asset absent from it is never re-uploaded
//! - A binary reference is set at most once per asset

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod error;
mod graph;
mod identifier;
mod locator;
mod relationship;

pub use asset::{Asset, AssetId, AssetKind, AssetStatus, BinaryReference};
pub use error::{GraphError, GraphResult};
pub use graph::AssetGraph;
pub use identifier::StoreIdentifier;
pub use locator::PayloadLocator;
pub use relationship::{Relationship, RelationshipKind};
