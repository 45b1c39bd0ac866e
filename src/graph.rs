use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::errors::TreeError;
use crate::zone::Tier;

/// Fixed identifier of the root product node. The root exists for the whole
/// lifetime of a session and is never deleted.
pub const ROOT_ID: &str = "root";

/// Vertical safety buffer below a parent before its child edge is flagged.
pub const EDGE_SAFETY_BUFFER: f64 = 50.0;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The editable fields of a product node. Everything else on a node is
/// structural.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NodeFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
}

/// A partial field update. Absent members leave the current value alone.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl FieldPatch {
    pub fn name(value: impl Into<String>) -> Self {
        Self {
            name: Some(value.into()),
            ..Self::default()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProductNode {
    pub id: String,
    pub position: Position,
    #[serde(default)]
    pub data: NodeFields,
}

impl ProductNode {
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            data: NodeFields::default(),
        }
    }

    pub fn tier(&self) -> Tier {
        Tier::of_y(self.position.y)
    }
}

/// A parent -> child relationship. The `invalid` flag is interaction-time
/// feedback for a child dragged above its parent; it is never persisted.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip)]
    pub invalid: bool,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("e-{}-{}", source, target),
            source,
            target,
            invalid: false,
        }
    }
}

/// The canonical in-memory tree for one editing session: product nodes and
/// the directed parent -> child edges between them. The single-parent /
/// no-cycle invariant is enforced here, at the store boundary, so that the
/// export walk is always a terminating depth-first traversal.
#[derive(Clone, Debug, Default)]
pub struct ProductGraph {
    pub nodes: IndexMap<String, ProductNode>,
    pub edges: Vec<Edge>,
}

impl ProductGraph {
    pub fn get_node(&self, id: &str) -> Option<&ProductNode> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn add_node(&mut self, node: ProductNode) -> Result<(), TreeError> {
        if self.nodes.contains_key(&node.id) {
            return Err(TreeError::NodeAlreadyExists(node.id));
        }
        debug!("Adding node {} at {:?}", node.id, node.position);
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Connect `source` -> `target`. Rejects missing endpoints, a second
    /// parent for `target`, any edge into the root, and edges that would
    /// close a cycle.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<(), TreeError> {
        if !self.nodes.contains_key(source) {
            return Err(TreeError::NodeNotFound(source.to_string()));
        }
        if !self.nodes.contains_key(target) {
            return Err(TreeError::NodeNotFound(target.to_string()));
        }
        if target == ROOT_ID {
            return Err(TreeError::RootReparent(source.to_string()));
        }
        if let Some(existing) = self.parent_edge(target) {
            return Err(TreeError::DuplicateParent {
                node: target.to_string(),
                parent: existing.source.clone(),
            });
        }
        if source == target || self.is_ancestor(target, source) {
            return Err(TreeError::CycleDetected {
                from: source.to_string(),
                to: target.to_string(),
            });
        }

        debug!("Adding edge {} -> {}", source, target);
        self.edges.push(Edge::new(source, target));
        Ok(())
    }

    /// True when `ancestor` lies on the parent chain above `node`.
    fn is_ancestor(&self, ancestor: &str, node: &str) -> bool {
        let mut current = node.to_string();
        let mut seen = HashSet::new();
        while let Some(edge) = self.parent_edge(&current) {
            if edge.source == ancestor {
                return true;
            }
            // Guard against drift in hydrated data; a well-formed graph
            // cannot loop here.
            if !seen.insert(edge.source.clone()) {
                warn!("Parent chain of {} loops at {}", node, edge.source);
                return false;
            }
            current = edge.source.clone();
        }
        false
    }

    /// The unique incoming edge of `id`, if any. The root and detached
    /// nodes have none.
    pub fn parent_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.target == id)
    }

    pub fn parent_of(&self, id: &str) -> Option<&ProductNode> {
        self.parent_edge(id)
            .and_then(|edge| self.nodes.get(&edge.source))
    }

    /// Direct children of `id`, in edge insertion order.
    pub fn children_of(&self, id: &str) -> Vec<&ProductNode> {
        self.edges
            .iter()
            .filter(|e| e.source == id)
            .filter_map(|e| self.nodes.get(&e.target))
            .collect()
    }

    /// Merge a field patch into a node. A no-op when the id is absent.
    pub fn update_node_fields(&mut self, id: &str, patch: FieldPatch) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            debug!("Ignoring field update for unknown node {}", id);
            return false;
        };
        if let Some(name) = patch.name {
            node.data.name = name;
        }
        if let Some(link) = patch.link {
            node.data.link = link;
        }
        if let Some(description) = patch.description {
            node.data.description = description;
        }
        true
    }

    /// Set a node's position. The zone clamp belongs to the interaction
    /// layer; this is only the hook point the placement validator observes.
    pub fn update_node_position(&mut self, id: &str, position: Position) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Re-check the vertical ordering of the moved node against its parent.
    ///
    /// The relationship is invalid while `child.y < parent.y + buffer`. The
    /// flag is advisory feedback only and never blocks movement. Returns
    /// `Some(new_state)` when the flag flipped and `None` when nothing
    /// changed, so repeated evaluation of an unchanged graph is free.
    pub fn revalidate_incoming_edge(&mut self, id: &str) -> Option<bool> {
        let (edge_idx, parent_y, child_y) = {
            let edge_idx = self.edges.iter().position(|e| e.target == id)?;
            let parent = self.nodes.get(&self.edges[edge_idx].source)?;
            let child = self.nodes.get(id)?;
            (edge_idx, parent.position.y, child.position.y)
        };

        let invalid = child_y < parent_y + EDGE_SAFETY_BUFFER;
        let edge = &mut self.edges[edge_idx];
        if edge.invalid == invalid {
            return None;
        }
        edge.invalid = invalid;
        debug!(
            "Edge {} is now {}",
            edge.id,
            if invalid { "invalid" } else { "valid" }
        );
        Some(invalid)
    }

    /// Delete a node and every edge touching it. The root is protected.
    /// Direct edges only: descendants become detached, they are not
    /// cascade-deleted.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if id == ROOT_ID {
            debug!("Refusing to remove the root node");
            return false;
        }
        if self.nodes.shift_remove(id).is_none() {
            return false;
        }
        self.edges.retain(|e| e.source != id && e.target != id);
        true
    }

    pub fn stats(&self) -> String {
        format!("Nodes: {}, Edges: {}", self.nodes.len(), self.edges.len())
    }

    /// Structural health check used before rendering exports. Errors are
    /// reported, not fixed; hydration already tolerates drift.
    pub fn verify_integrity(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.nodes.contains_key(ROOT_ID) {
            errors.push("Root node is missing".to_string());
        }

        for edge in &self.edges {
            if !self.nodes.contains_key(&edge.source) {
                errors.push(format!(
                    "Edge id:[{}] source {:?} not found in nodes",
                    edge.id, edge.source
                ));
            }
            if !self.nodes.contains_key(&edge.target) {
                errors.push(format!(
                    "Edge id:[{}] target {:?} not found in nodes",
                    edge.id, edge.target
                ));
            }
        }

        let mut incoming: IndexMap<&str, usize> = IndexMap::new();
        for edge in &self.edges {
            *incoming.entry(edge.target.as_str()).or_insert(0) += 1;
        }
        for (target, count) in &incoming {
            if *count > 1 {
                errors.push(format!("Node id:[{}] has {} incoming edges", target, count));
            }
        }
        if incoming.contains_key(ROOT_ID) {
            errors.push("Root node has an incoming edge".to_string());
        }

        if errors.is_empty() {
            debug!("Graph integrity verified: {}", self.stats());
            Ok(())
        } else {
            Err(errors)
        }
    }
}
