// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the layout engine.

use canopy_model::NodeId;
use hashbrown::HashMap;
use kurbo::Point;

/// Tunables for a layout pass. The defaults are the stock mind-map metrics.
#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
    /// Fixed box width for every node.
    pub box_width: f64,
    /// Inner padding between box edge and text.
    pub padding: f64,
    /// Spacing floor between vertically adjacent leaves.
    pub v_spacing: f64,
    /// Horizontal distance per depth level.
    pub h_spacing: f64,
    /// Minimum clear gap between adjacent boxes when heights exceed the floor.
    pub box_gap: f64,
    /// Split first-level branches across two mirrored half-trees.
    pub bidirectional: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            box_width: 150.0,
            padding: 5.0,
            v_spacing: 90.0,
            h_spacing: 220.0,
            box_gap: 10.0,
            bidirectional: true,
        }
    }
}

impl LayoutConfig {
    /// Maximum rendered text width inside a box.
    pub fn text_wrap_width(&self) -> f64 {
        self.box_width - self.padding * 2.0
    }
}

/// Which half-tree a node belongs to. Only meaningful in bidirectional mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The root.
    Center,
    /// The mirrored half growing leftward.
    Left,
    /// The half growing rightward.
    Right,
}

/// A node's computed placement. Ephemeral: rebuilt on every layout pass.
#[derive(Clone, Copy, Debug)]
pub struct LayoutNode {
    /// The tree node this placement belongs to.
    pub id: NodeId,
    /// Distance from the root (root = 0).
    pub depth: usize,
    /// Box center in the layout plane.
    pub pos: Point,
    /// Half-tree assignment.
    pub side: Side,
    /// Box height, sized from the wrapped label.
    pub box_height: f64,
    /// Parent placement, for traversal only.
    pub parent: Option<NodeId>,
}

/// A drawable parent→child connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    /// Parent end.
    pub source: NodeId,
    /// Child end.
    pub target: NodeId,
}

/// The result of a layout pass: a placement for every live node plus the
/// edge list, both keyed by [`NodeId`].
#[derive(Clone, Debug, Default)]
pub struct Layout {
    /// Placements by node id.
    pub nodes: HashMap<NodeId, LayoutNode>,
    /// Edges in deterministic order: root→branch first, then within each
    /// half in traversal order.
    pub edges: Vec<Edge>,
}

impl Layout {
    /// Placement for a node, if it was part of this pass.
    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(&id)
    }

    /// Number of placed nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
