//! Conversions between the in-memory graph and wire documents.

use exsync_graph::{
    Asset, AssetGraph, AssetId, AssetKind, AssetStatus, BinaryReference, RelationshipKind,
    StoreIdentifier,
};
use exsync_protocol::{AssetRecord, GraphSnapshot, RelationshipRecord, SchemaDocument};

/// Serializes the full structure of a graph for schema publication.
///
/// Covers every asset and relationship, not only those touched by the
/// current run.
#[must_use]
pub fn document_from_graph(graph: &AssetGraph) -> SchemaDocument {
    let assets = graph
        .assets()
        .map(|asset| AssetRecord {
            id: asset.id.as_str().to_string(),
            kind: asset.kind.as_str().to_string(),
            name: asset.name().map(str::to_string),
            properties: asset.properties.clone(),
            binary_reference: asset
                .binary_reference
                .as_ref()
                .map(|r| r.locator.clone()),
        })
        .collect();

    let relationships = graph
        .relationships()
        .iter()
        .map(|rel| RelationshipRecord {
            from: rel.from.as_str().to_string(),
            to: rel.to.as_str().to_string(),
            kind: rel.kind.to_string(),
        })
        .collect();

    SchemaDocument {
        assets,
        relationships,
    }
}

/// Rebuilds an asset graph from a fetched snapshot.
///
/// All assets come back `Synced` at the snapshot's revision. Relationship
/// records with unknown endpoints or kinds are skipped; a snapshot reflects
/// remote state and may be ahead of or behind what this client knows.
#[must_use]
pub fn graph_from_snapshot(identifier: &StoreIdentifier, snapshot: &GraphSnapshot) -> AssetGraph {
    let mut resolved = identifier.clone();
    if resolved.title.is_none() {
        resolved.title = snapshot.title.clone();
    }
    let mut graph = AssetGraph::for_store(resolved);

    for record in &snapshot.schema.assets {
        let mut asset = Asset::new(
            AssetId::from(record.id.clone()),
            AssetKind::from_name(&record.kind),
        );
        asset.properties = record.properties.clone();
        if let Some(name) = &record.name {
            if !asset.properties.contains_key("name") {
                asset.properties.insert("name".to_string(), name.clone());
            }
        }
        asset.status = AssetStatus::Synced;
        asset.revision_id = Some(snapshot.revision_id.clone());
        asset.binary_reference = record
            .binary_reference
            .as_ref()
            .map(|locator| BinaryReference::new(locator.clone()));
        // Duplicate ids cannot occur in a well-formed snapshot; keep the
        // first record if they do.
        let _ = graph.insert_fetched(asset);
    }

    for record in &snapshot.schema.relationships {
        let kind = match record.kind.as_str() {
            "Reference" => RelationshipKind::Reference,
            "Containment" => RelationshipKind::Containment,
            _ => continue,
        };
        let _ = graph.add_relationship(
            &AssetId::from(record.from.clone()),
            &AssetId::from(record.to.clone()),
            kind,
        );
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use exsync_graph::PayloadLocator;

    fn sample_graph() -> AssetGraph {
        let mut graph = AssetGraph::for_store(StoreIdentifier::new("col", "exch"));
        graph
            .add_asset(
                AssetKind::Element,
                Some(AssetId::from("wall-1")),
                [("name".to_string(), "Wall".to_string())],
            )
            .unwrap();
        graph
            .add_asset(AssetKind::Geometry, Some(AssetId::from("geo-1")), [])
            .unwrap();
        graph
            .add_relationship(
                &AssetId::from("wall-1"),
                &AssetId::from("geo-1"),
                RelationshipKind::Containment,
            )
            .unwrap();
        graph
    }

    #[test]
    fn document_covers_whole_graph() {
        let mut graph = sample_graph();
        graph
            .mark_geometry_pending(&AssetId::from("geo-1"), PayloadLocator::buffer(vec![1]))
            .unwrap();
        graph
            .link_binary(&AssetId::from("geo-1"), BinaryReference::new("store://b/1"))
            .unwrap();

        let doc = document_from_graph(&graph);
        assert_eq!(doc.assets.len(), 2);
        assert_eq!(doc.relationships.len(), 1);
        assert_eq!(doc.assets[0].name.as_deref(), Some("Wall"));
        assert_eq!(
            doc.assets[1].binary_reference.as_deref(),
            Some("store://b/1")
        );
        assert_eq!(doc.relationships[0].kind, "Containment");
    }

    #[test]
    fn snapshot_round_trips_to_graph() {
        let graph = sample_graph();
        let snapshot = GraphSnapshot {
            exchange_id: "exch".into(),
            title: Some("Bridge".into()),
            revision_id: "rev-3".into(),
            schema: document_from_graph(&graph),
        };

        let rebuilt = graph_from_snapshot(&StoreIdentifier::new("col", "exch"), &snapshot);
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.relationships().len(), 1);
        assert_eq!(rebuilt.identifier().unwrap().title.as_deref(), Some("Bridge"));

        let wall = rebuilt.get(&AssetId::from("wall-1")).unwrap();
        assert_eq!(wall.status, AssetStatus::Synced);
        assert_eq!(wall.revision_id.as_deref(), Some("rev-3"));
        assert_eq!(wall.name(), Some("Wall"));
    }

    #[test]
    fn snapshot_skips_unknown_relationship_kinds() {
        let snapshot = GraphSnapshot {
            exchange_id: "exch".into(),
            title: None,
            revision_id: "rev-1".into(),
            schema: SchemaDocument {
                assets: vec![],
                relationships: vec![RelationshipRecord {
                    from: "a".into(),
                    to: "b".into(),
                    kind: "Teleports".into(),
                }],
            },
        };
        let graph = graph_from_snapshot(&StoreIdentifier::new("c", "e"), &snapshot);
        assert!(graph.relationships().is_empty());
    }
}
