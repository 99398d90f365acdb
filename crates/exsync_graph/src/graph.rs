//! The asset graph and its mutation operations.

use crate::asset::{Asset, AssetId, AssetKind, AssetStatus, BinaryReference};
use crate::error::{GraphError, GraphResult};
use crate::identifier::StoreIdentifier;
use crate::locator::PayloadLocator;
use crate::relationship::{Relationship, RelationshipKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An in-memory graph of assets, relationships and pending uploads.
///
/// Iteration over assets and pending uploads follows insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetGraph {
    assets: IndexMap<AssetId, Asset>,
    relationships: Vec<Relationship>,
    pending_uploads: IndexMap<AssetId, PayloadLocator>,
    identifier: Option<StoreIdentifier>,
}

impl AssetGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph bound to a store identifier.
    #[must_use]
    pub fn for_store(identifier: StoreIdentifier) -> Self {
        Self {
            identifier: Some(identifier),
            ..Self::default()
        }
    }

    /// Returns the target store identifier, if set.
    #[must_use]
    pub fn identifier(&self) -> Option<&StoreIdentifier> {
        self.identifier.as_ref()
    }

    /// Binds the graph to a store identifier.
    pub fn set_identifier(&mut self, identifier: StoreIdentifier) {
        self.identifier = Some(identifier);
    }

    /// Adds a new asset with status `CreatedLocal`.
    ///
    /// Generates an id when `id` is `None`. Fails with
    /// [`GraphError::DuplicateAsset`] on collision.
    pub fn add_asset(
        &mut self,
        kind: AssetKind,
        id: Option<AssetId>,
        properties: impl IntoIterator<Item = (String, String)>,
    ) -> GraphResult<&Asset> {
        self.insert_asset(kind, id, properties, AssetStatus::CreatedLocal)
    }

    /// Adds a new asset with status `PendingLocal`.
    ///
    /// Used for assets whose local content work is still in flight.
    pub fn add_pending_asset(
        &mut self,
        kind: AssetKind,
        id: Option<AssetId>,
        properties: impl IntoIterator<Item = (String, String)>,
    ) -> GraphResult<&Asset> {
        self.insert_asset(kind, id, properties, AssetStatus::PendingLocal)
    }

    fn insert_asset(
        &mut self,
        kind: AssetKind,
        id: Option<AssetId>,
        properties: impl IntoIterator<Item = (String, String)>,
        status: AssetStatus,
    ) -> GraphResult<&Asset> {
        let id = id.unwrap_or_else(AssetId::generate);
        if self.assets.contains_key(&id) {
            return Err(GraphError::DuplicateAsset(id));
        }

        let mut asset = Asset::new(id.clone(), kind);
        asset.status = status;
        asset.properties.extend(properties);

        self.assets.insert(id.clone(), asset);
        Ok(&self.assets[&id])
    }

    /// Inserts a fully formed asset, as produced from a fetched snapshot.
    pub fn insert_fetched(&mut self, asset: Asset) -> GraphResult<()> {
        if self.assets.contains_key(&asset.id) {
            return Err(GraphError::DuplicateAsset(asset.id));
        }
        self.assets.insert(asset.id.clone(), asset);
        Ok(())
    }

    /// Adds a relationship between two existing assets.
    ///
    /// Fails with [`GraphError::UnknownAsset`] if either endpoint is absent.
    pub fn add_relationship(
        &mut self,
        from: &AssetId,
        to: &AssetId,
        kind: RelationshipKind,
    ) -> GraphResult<()> {
        if !self.assets.contains_key(from) {
            return Err(GraphError::UnknownAsset(from.clone()));
        }
        if !self.assets.contains_key(to) {
            return Err(GraphError::UnknownAsset(to.clone()));
        }
        self.relationships
            .push(Relationship::new(from.clone(), to.clone(), kind));
        Ok(())
    }

    /// Marks a geometry asset's payload as pending upload.
    ///
    /// Fails with [`GraphError::WrongAssetKind`] unless the asset is a
    /// geometry asset, and with [`GraphError::AlreadyLinked`] if the asset
    /// already carries a binary reference (re-upload is a separate flow).
    pub fn mark_geometry_pending(
        &mut self,
        id: &AssetId,
        locator: PayloadLocator,
    ) -> GraphResult<()> {
        let asset = self
            .assets
            .get(id)
            .ok_or_else(|| GraphError::UnknownAsset(id.clone()))?;

        if !asset.is_geometry() {
            return Err(GraphError::wrong_kind(
                id.clone(),
                AssetKind::Geometry.as_str(),
                asset.kind.as_str(),
            ));
        }
        if asset.binary_reference.is_some() {
            return Err(GraphError::AlreadyLinked(id.clone()));
        }

        self.pending_uploads.insert(id.clone(), locator);
        Ok(())
    }

    /// Returns the pending uploads in insertion order.
    pub fn pending_uploads(&self) -> impl Iterator<Item = (&AssetId, &PayloadLocator)> {
        self.pending_uploads.iter()
    }

    /// Returns the number of pending uploads.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending_uploads.len()
    }

    /// Returns true if no uploads are pending.
    #[must_use]
    pub fn has_no_pending(&self) -> bool {
        self.pending_uploads.is_empty()
    }

    /// Links an uploaded payload to its asset and removes the pending entry.
    ///
    /// The reference is write-once: fails with
    /// [`GraphError::AlreadyLinked`] if one is already set.
    pub fn link_binary(&mut self, id: &AssetId, reference: BinaryReference) -> GraphResult<()> {
        let asset = self
            .assets
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownAsset(id.clone()))?;

        if asset.binary_reference.is_some() {
            return Err(GraphError::AlreadyLinked(id.clone()));
        }
        asset.binary_reference = Some(reference);
        self.pending_uploads.shift_remove(id);
        Ok(())
    }

    /// Marks an asset as synced with the given revision.
    pub fn mark_synced(&mut self, id: &AssetId, revision_id: &str) -> GraphResult<()> {
        let asset = self
            .assets
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownAsset(id.clone()))?;
        asset.status = AssetStatus::Synced;
        asset.revision_id = Some(revision_id.to_string());
        Ok(())
    }

    /// Removes a pending-upload entry without linking anything.
    pub fn clear_pending(&mut self, id: &AssetId) {
        self.pending_uploads.shift_remove(id);
    }

    /// Returns an asset by id.
    #[must_use]
    pub fn get(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.get(id)
    }

    /// Returns true if the graph contains the asset.
    #[must_use]
    pub fn contains(&self, id: &AssetId) -> bool {
        self.assets.contains_key(id)
    }

    /// Returns the number of assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns true if the graph has no assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Iterates over assets in insertion order.
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    /// Returns all relationships in insertion order.
    #[must_use]
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Iterates over relationships originating at the given asset.
    pub fn relationships_from<'a>(
        &'a self,
        id: &'a AssetId,
    ) -> impl Iterator<Item = &'a Relationship> {
        self.relationships.iter().filter(move |r| &r.from == id)
    }
}
