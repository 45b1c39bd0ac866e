use tracing::{debug, warn};

use crate::errors::TreeError;
use crate::graph::{FieldPatch, Position, ProductGraph, ProductNode, ROOT_ID};
use crate::zone::{Tier, SIBLING_SPACING_X};

/// Where the root product starts on a fresh canvas.
const ROOT_START: Position = Position { x: 250.0, y: 50.0 };

/// Prefix for allocated node identifiers.
const NODE_ID_PREFIX: &str = "product-";

/// The interactive tree editor for one session: owns the graph, the fixed
/// root, and the identifier allocator. All structural edits go through here;
/// persisted snapshots carry data only, so hydration rebuilds an editor and
/// the operation set on this type is the behavior that gets re-attached.
#[derive(Clone, Debug)]
pub struct TreeEditor {
    graph: ProductGraph,
    next_id: u64,
}

impl TreeEditor {
    /// A fresh session: just the root node, empty fields.
    pub fn new() -> Self {
        let mut graph = ProductGraph::default();
        graph
            .add_node(ProductNode::new(ROOT_ID, ROOT_START))
            .unwrap_or_else(|_| unreachable!("empty graph cannot contain the root"));
        Self { graph, next_id: 0 }
    }

    /// Wrap a restored graph. Guarantees the root exists and seeds the id
    /// allocator past every restored identifier.
    pub fn from_graph(mut graph: ProductGraph) -> Self {
        if graph.get_node(ROOT_ID).is_none() {
            warn!("Restored snapshot has no root node; recreating it");
            let _ = graph.add_node(ProductNode::new(ROOT_ID, ROOT_START));
        }
        let next_id = graph
            .nodes
            .keys()
            .filter_map(|id| id.strip_prefix(NODE_ID_PREFIX))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self { graph, next_id }
    }

    pub fn graph(&self) -> &ProductGraph {
        &self.graph
    }

    fn allocate_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("{}{}", NODE_ID_PREFIX, self.next_id);
            if self.graph.get_node(&id).is_none() {
                return id;
            }
        }
    }

    /// Create a child under `parent_id` and connect it, returning the new
    /// node's identifier.
    ///
    /// The child lands one tier below its parent (leaves keep their children
    /// in the leaf band), at the band's representative y. Horizontally it
    /// packs left to right: next to the rightmost node already in the target
    /// band, or straight under the parent when the band is empty.
    pub fn add_child(&mut self, parent_id: &str) -> Result<String, TreeError> {
        let parent = self
            .graph
            .get_node(parent_id)
            .ok_or_else(|| TreeError::NodeNotFound(parent_id.to_string()))?;
        let parent_pos = parent.position;

        let target_tier = parent.tier().child();
        let y = Tier::default_child_y(parent_pos.y);

        let rightmost = self
            .graph
            .nodes
            .values()
            .filter(|n| n.tier() == target_tier)
            .map(|n| n.position.x)
            .fold(None, |acc: Option<f64>, x| {
                Some(acc.map_or(x, |best| best.max(x)))
            });
        let x = match rightmost {
            Some(right) => parent_pos.x.max(right + SIBLING_SPACING_X),
            None => parent_pos.x,
        };

        let id = self.allocate_id();
        debug!(
            "Adding child {} of {} in {:?} band at ({}, {})",
            id, parent_id, target_tier, x, y
        );
        self.graph
            .add_node(ProductNode::new(id.clone(), Position::new(x, y)))?;
        self.graph.add_edge(parent_id, &id)?;
        Ok(id)
    }

    /// Create a sibling: another child of the same parent. Rejected for the
    /// root, which has no parent to attach a sibling under.
    pub fn add_sibling(&mut self, node_id: &str) -> Result<String, TreeError> {
        if node_id == ROOT_ID {
            return Err(TreeError::RootSibling);
        }
        let parent_id = match self.graph.parent_edge(node_id) {
            Some(edge) => edge.source.clone(),
            None => {
                warn!("Could not find parent of {} for sibling creation", node_id);
                return Err(TreeError::NodeDetached(node_id.to_string()));
            }
        };
        self.add_child(&parent_id)
    }

    /// Delete a node and its direct edges. No-op on the root. Descendants
    /// stay in the graph, detached from the tree.
    pub fn delete_node(&mut self, id: &str) -> bool {
        self.graph.remove_node(id)
    }

    /// Merge field edits into a node. No-op when the id is unknown.
    pub fn edit_fields(&mut self, id: &str, patch: FieldPatch) -> bool {
        self.graph.update_node_fields(id, patch)
    }

    /// Apply a drag position and re-check the moved node's parent edge.
    /// Returns the new validity flag when it flipped.
    pub fn move_node(&mut self, id: &str, position: Position) -> Option<bool> {
        if !self.graph.update_node_position(id, position) {
            return None;
        }
        self.graph.revalidate_incoming_edge(id)
    }

    /// A manually drawn connection. The store enforces the single-parent /
    /// no-cycle invariant; a fresh edge is validated immediately so a child
    /// connected above its parent is flagged right away.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<(), TreeError> {
        self.graph.add_edge(source, target)?;
        self.graph.revalidate_incoming_edge(target);
        Ok(())
    }
}

impl Default for TreeEditor {
    fn default() -> Self {
        Self::new()
    }
}
