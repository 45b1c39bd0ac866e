use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::editor::TreeEditor;
use crate::graph::{Edge, FieldPatch, ProductGraph, ProductNode, ROOT_ID};

/// The flat, fully restorable form of the live graph: every node and every
/// edge, data only. Interaction-time state (edge validity) is dropped.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TreeSnapshot {
    #[serde(default)]
    pub nodes: Vec<ProductNode>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// One node of the derived nested hierarchy: the node's fields plus its
/// children, depth first. Downstream consumers that do not need graph
/// mechanics read this form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HierarchyNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    pub id: String,
    pub children: Vec<HierarchyNode>,
}

/// Strategic detail fields captured alongside the tree.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ItemDetails {
    #[serde(default)]
    pub positioning: String,
    #[serde(rename = "valueProp", default)]
    pub value_prop: String,
    #[serde(default)]
    pub vision: String,
    #[serde(default)]
    pub goals: String,
}

/// The record exchanged with the persistence collaborator: the root's own
/// fields, the strategy form, the restorable snapshot, and the derived
/// sub-product hierarchy.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ItemRecord {
    #[serde(rename = "type", default)]
    pub entity_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stakeholders: String,
    #[serde(default)]
    pub details: ItemDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_data: Option<TreeSnapshot>,
    #[serde(default)]
    pub sub_products: Vec<HierarchyNode>,
}

/// Capture the flat snapshot of the live graph.
pub fn snapshot(graph: &ProductGraph) -> TreeSnapshot {
    TreeSnapshot {
        nodes: graph.nodes.values().cloned().collect(),
        edges: graph
            .edges
            .iter()
            .map(|e| Edge {
                invalid: false,
                ..e.clone()
            })
            .collect(),
    }
}

/// Depth-first walk from the root following outgoing edges. Edges whose
/// target node is missing are dropped silently; with the single-parent
/// invariant enforced at the store the walk always terminates.
pub fn build_hierarchy(graph: &ProductGraph) -> Vec<HierarchyNode> {
    hierarchy_children(graph, ROOT_ID)
}

fn hierarchy_children(graph: &ProductGraph, parent_id: &str) -> Vec<HierarchyNode> {
    graph
        .edges
        .iter()
        .filter(|e| e.source == parent_id)
        .filter_map(|e| match graph.get_node(&e.target) {
            Some(node) => Some(HierarchyNode {
                name: node.data.name.clone(),
                link: node.data.link.clone(),
                description: node.data.description.clone(),
                id: node.id.clone(),
                children: hierarchy_children(graph, &node.id),
            }),
            None => {
                debug!("Dropping edge {} to missing node {}", e.id, e.target);
                None
            }
        })
        .collect()
}

/// Assemble the canonical record for the current graph state, carrying the
/// form-level fields (type, stakeholders, strategy details) over from the
/// previous record. Recomputed after every mutation; last write wins.
pub fn export_item(graph: &ProductGraph, base: &ItemRecord) -> ItemRecord {
    let mut record = base.clone();
    if let Some(root) = graph.get_node(ROOT_ID) {
        record.name = root.data.name.clone();
        record.link = root.data.link.clone();
        record.description = root.data.description.clone();
    }
    record.tree_data = Some(snapshot(graph));
    record.sub_products = build_hierarchy(graph);
    record
}

/// Rebuild a live editor from a stored record.
///
/// With a populated snapshot every node and edge is restored; edges that
/// violate invariants or reference missing nodes are dropped as tolerable
/// drift, never an error. Without a snapshot, legacy single-node records
/// populate only the root's fields (degraded restore).
pub fn hydrate(record: &ItemRecord) -> TreeEditor {
    match &record.tree_data {
        Some(tree) if !tree.nodes.is_empty() => {
            let mut graph = ProductGraph::default();
            for node in &tree.nodes {
                if let Err(e) = graph.add_node(node.clone()) {
                    debug!("Skipping duplicate snapshot node: {}", e);
                }
            }
            for edge in &tree.edges {
                if let Err(e) = graph.add_edge(&edge.source, &edge.target) {
                    debug!("Dropping snapshot edge {}: {}", edge.id, e);
                }
            }
            TreeEditor::from_graph(graph)
        }
        _ => {
            let mut editor = TreeEditor::new();
            editor.edit_fields(
                ROOT_ID,
                FieldPatch {
                    name: Some(record.name.clone()),
                    link: Some(record.link.clone()),
                    description: Some(record.description.clone()),
                },
            );
            editor
        }
    }
}
