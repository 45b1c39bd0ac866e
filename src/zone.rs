use serde::{Deserialize, Serialize};

/// Y threshold below which a node sits in the root band.
pub const ROOT_MAX_Y: f64 = 250.0;
/// Y threshold below which a node sits in the branch band.
pub const BRANCH_MAX_Y: f64 = 500.0;

/// How far the editing surface extends on the unconstrained axes.
pub const CANVAS_REACH: f64 = 10_000.0;

/// Horizontal spacing between siblings placed in the same band.
pub const SIBLING_SPACING_X: f64 = 300.0;
/// Vertical offset for a child stacked under a leaf-band parent.
pub const LEAF_STACK_OFFSET_Y: f64 = 200.0;

/// One of the three vertical bands a node may occupy. Tier membership is
/// derived from the node's y coordinate and is never stored.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Root,
    Branch,
    Leaf,
}

impl Tier {
    /// Resolve the tier a y coordinate falls into.
    pub fn of_y(y: f64) -> Tier {
        if y < ROOT_MAX_Y {
            Tier::Root
        } else if y < BRANCH_MAX_Y {
            Tier::Branch
        } else {
            Tier::Leaf
        }
    }

    pub fn contains(&self, y: f64) -> bool {
        Tier::of_y(y) == *self
    }

    /// The tier a child of this tier belongs to. The bottom band collapses:
    /// a leaf's children stay leaves.
    pub fn child(&self) -> Tier {
        match self {
            Tier::Root => Tier::Branch,
            Tier::Branch => Tier::Leaf,
            Tier::Leaf => Tier::Leaf,
        }
    }

    /// Axis-aligned drag extent `[[min_x, min_y], [max_x, max_y]]` for nodes
    /// in this tier. The interaction layer clamps dragging to this box; the
    /// store itself does not.
    pub fn extent(&self) -> [[f64; 2]; 2] {
        match self {
            Tier::Root => [[-CANVAS_REACH, -CANVAS_REACH], [CANVAS_REACH, ROOT_MAX_Y]],
            Tier::Branch => [[-CANVAS_REACH, ROOT_MAX_Y], [CANVAS_REACH, BRANCH_MAX_Y]],
            Tier::Leaf => [[-CANVAS_REACH, BRANCH_MAX_Y], [CANVAS_REACH, CANVAS_REACH]],
        }
    }

    /// Default y for a new child of a parent sitting at `parent_y`.
    /// Representative band centers for branch and leaf; a stacked offset
    /// when the parent is already in the leaf band.
    pub fn default_child_y(parent_y: f64) -> f64 {
        match Tier::of_y(parent_y) {
            Tier::Root => 350.0,
            Tier::Branch => 600.0,
            Tier::Leaf => parent_y + LEAF_STACK_OFFSET_Y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(Tier::of_y(-500.0), Tier::Root);
        assert_eq!(Tier::of_y(0.0), Tier::Root);
        assert_eq!(Tier::of_y(249.9), Tier::Root);
        assert_eq!(Tier::of_y(250.0), Tier::Branch);
        assert_eq!(Tier::of_y(499.9), Tier::Branch);
        assert_eq!(Tier::of_y(500.0), Tier::Leaf);
        assert_eq!(Tier::of_y(9000.0), Tier::Leaf);
    }

    #[test]
    fn child_tier_advances_and_collapses() {
        assert_eq!(Tier::Root.child(), Tier::Branch);
        assert_eq!(Tier::Branch.child(), Tier::Leaf);
        assert_eq!(Tier::Leaf.child(), Tier::Leaf);
    }

    #[test]
    fn extents_stack_without_gaps() {
        assert_eq!(Tier::Root.extent()[1][1], ROOT_MAX_Y);
        assert_eq!(Tier::Branch.extent()[0][1], ROOT_MAX_Y);
        assert_eq!(Tier::Branch.extent()[1][1], BRANCH_MAX_Y);
        assert_eq!(Tier::Leaf.extent()[0][1], BRANCH_MAX_Y);
    }

    #[test]
    fn default_child_y_lands_in_child_band() {
        assert!(Tier::Branch.contains(Tier::default_child_y(50.0)));
        assert!(Tier::Leaf.contains(Tier::default_child_y(350.0)));
        // Leaf parent keeps its children in the leaf band.
        assert_eq!(Tier::default_child_y(600.0), 800.0);
        assert!(Tier::Leaf.contains(Tier::default_child_y(600.0)));
    }
}
