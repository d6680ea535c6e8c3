// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection of a layout into drawable primitives.

use canopy_layout::{Layout, LayoutConfig, fit_to_viewport};
use canopy_model::{MindTree, NodeId};
use canopy_text::{FontSpec, Lines, SizedLabel};
use hashbrown::HashMap;
use kurbo::{BezPath, Point, Rect, Size, TranslateScale, Vec2};

use crate::palette::{self, Color};

/// Corner radius of every node box.
pub const CORNER_RADIUS: f64 = 5.0;

/// Stroke width of an unselected box.
pub const NODE_STROKE_WIDTH: f64 = 1.0;

/// Stroke width of the selected box.
pub const SELECTED_STROKE_WIDTH: f64 = 2.0;

/// Stroke width of an edge curve.
pub const EDGE_STROKE_WIDTH: f64 = 1.5;

bitflags::bitflags! {
    /// Per-box render state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct NodeFlags: u8 {
        /// The box is the current selection and draws the highlight stroke.
        const SELECTED = 1 << 0;
        /// An edit overlay covers the label; the text is not drawn.
        const TEXT_HIDDEN = 1 << 1;
    }
}

/// One drawable node box with its wrapped label.
#[derive(Clone, Debug)]
pub struct NodeBox {
    /// The node this box draws.
    pub id: NodeId,
    /// World-space bounds, centered on the layout position.
    pub rect: Rect,
    /// Background fill, from the branch palette.
    pub fill: Color,
    /// Render state flags.
    pub flags: NodeFlags,
    /// True tree depth, which picks the font.
    pub depth: usize,
    /// Wrapped label lines, top to bottom.
    pub lines: Lines,
    /// Font for every line of this box.
    pub font: FontSpec,
    /// Corner radius for the rounded rect.
    pub corner_radius: f64,
}

impl NodeBox {
    /// Outline color, selection-dependent.
    pub fn stroke(&self) -> Color {
        if self.flags.contains(NodeFlags::SELECTED) {
            palette::SELECTED_STROKE
        } else {
            palette::NODE_STROKE
        }
    }

    /// Outline width, selection-dependent.
    pub fn stroke_width(&self) -> f64 {
        if self.flags.contains(NodeFlags::SELECTED) {
            SELECTED_STROKE_WIDTH
        } else {
            NODE_STROKE_WIDTH
        }
    }
}

/// One drawable parent-to-child connector.
#[derive(Clone, Debug)]
pub struct EdgeCurve {
    /// Parent endpoint.
    pub source: NodeId,
    /// Child endpoint.
    pub target: NodeId,
    /// Horizontal cubic between the two box centers.
    pub path: BezPath,
}

/// The user-facing view transform, plus whether the initial fit has run.
#[derive(Clone, Copy, Debug)]
pub struct ViewState {
    /// World-to-viewport transform.
    pub transform: TranslateScale,
    /// Set once the first render has fitted the drawing.
    pub fitted: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            transform: TranslateScale::new(Vec2::ZERO, 1.0),
            fitted: false,
        }
    }
}

/// Everything a rasterizer needs for one frame, in paint order.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Connectors, drawn first.
    pub edges: Vec<EdgeCurve>,
    /// Boxes and labels, drawn over the edges.
    pub nodes: Vec<NodeBox>,
    /// World-to-viewport transform to apply to the whole drawing.
    pub transform: TranslateScale,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            nodes: Vec::new(),
            transform: TranslateScale::new(Vec2::ZERO, 1.0),
        }
    }
}

/// Selection and edit state that dresses the projected boxes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Highlight {
    /// The selected node, if any.
    pub selected: Option<NodeId>,
    /// The node whose label is under an edit overlay, if any.
    pub editing: Option<NodeId>,
}

/// Build a horizontal cubic between two points, control points at the
/// horizontal midpoint of the span.
pub fn link_path(source: Point, target: Point) -> BezPath {
    let mid = (source.x + target.x) / 2.0;
    let mut path = BezPath::new();
    path.move_to(source);
    path.curve_to(
        Point::new(mid, source.y),
        Point::new(mid, target.y),
        target,
    );
    path
}

/// Project a laid-out tree into a [`Scene`].
///
/// The first projection after a load fits the drawing to the viewport and
/// records the transform in `view`; later projections reuse whatever
/// transform the user has panned or zoomed to.
pub fn project(
    tree: &MindTree,
    layout: &Layout,
    labels: &HashMap<NodeId, SizedLabel>,
    cfg: &LayoutConfig,
    viewport: Size,
    highlight: Highlight,
    view: &mut ViewState,
) -> Scene {
    if !view.fitted {
        view.transform = fit_to_viewport(layout, cfg, viewport);
        view.fitted = true;
    }

    let mut scene = Scene {
        transform: view.transform,
        ..Scene::default()
    };

    for edge in &layout.edges {
        let (Some(source), Some(target)) = (layout.get(edge.source), layout.get(edge.target))
        else {
            continue;
        };
        scene.edges.push(EdgeCurve {
            source: edge.source,
            target: edge.target,
            path: link_path(source.pos, target.pos),
        });
    }

    // Boxes come out in preorder so the paint order is stable frame to frame.
    for id in tree.descendants(tree.root()) {
        let Some(node) = layout.get(id) else {
            continue;
        };
        let depth = tree.depth_of(id).unwrap_or(0);
        let mut flags = NodeFlags::empty();
        if highlight.selected == Some(id) {
            flags |= NodeFlags::SELECTED;
        }
        if highlight.editing == Some(id) {
            flags |= NodeFlags::TEXT_HIDDEN;
        }
        let lines = labels
            .get(&id)
            .map(|sized| sized.lines.clone())
            .unwrap_or_default();
        scene.nodes.push(NodeBox {
            id,
            rect: Rect::from_center_size(node.pos, Size::new(cfg.box_width, node.box_height)),
            fill: palette::node_fill(depth, tree.branch_index(id)),
            flags,
            depth,
            lines,
            font: FontSpec::for_depth(depth),
            corner_radius: CORNER_RADIUS,
        });
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_layout::compute;
    use canopy_text::CellMeasure;
    use serde_json::json;

    fn fixture() -> (MindTree, LayoutConfig, Layout, HashMap<NodeId, SizedLabel>) {
        let tree = MindTree::normalize(&json!({
            "topic": "Flu",
            "children": [
                { "name": "Causes", "children": [ { "name": "Virus" } ] },
                { "name": "Symptoms", "children": [] },
            ]
        }))
        .unwrap();
        let cfg = LayoutConfig::default();
        let measure = CellMeasure::default();
        let mut labels = HashMap::new();
        for id in tree.descendants(tree.root()) {
            let depth = tree.depth_of(id).unwrap();
            let font = FontSpec::for_depth(depth);
            let sized = SizedLabel::new(
                tree.label(id).unwrap(),
                cfg.text_wrap_width(),
                cfg.padding,
                font,
                &measure,
            );
            labels.insert(id, sized);
        }
        let heights: HashMap<NodeId, f64> =
            labels.iter().map(|(&id, s)| (id, s.box_height)).collect();
        let layout = compute(&tree, &cfg, |id| heights[&id]);
        (tree, cfg, layout, labels)
    }

    #[test]
    fn selection_switches_stroke_and_width() {
        let (tree, cfg, layout, labels) = fixture();
        let selected = tree.children_of(tree.root())[0];
        let mut view = ViewState::default();
        let scene = project(
            &tree,
            &layout,
            &labels,
            &cfg,
            Size::new(800.0, 600.0),
            Highlight {
                selected: Some(selected),
                editing: None,
            },
            &mut view,
        );
        for node in &scene.nodes {
            if node.id == selected {
                assert_eq!(node.stroke(), palette::SELECTED_STROKE);
                assert_eq!(node.stroke_width(), SELECTED_STROKE_WIDTH);
            } else {
                assert_eq!(node.stroke(), palette::NODE_STROKE);
                assert_eq!(node.stroke_width(), NODE_STROKE_WIDTH);
            }
        }
    }

    #[test]
    fn editing_hides_text_on_that_box_only() {
        let (tree, cfg, layout, labels) = fixture();
        let editing = tree.children_of(tree.root())[1];
        let mut view = ViewState::default();
        let scene = project(
            &tree,
            &layout,
            &labels,
            &cfg,
            Size::new(800.0, 600.0),
            Highlight {
                selected: Some(editing),
                editing: Some(editing),
            },
            &mut view,
        );
        for node in &scene.nodes {
            assert_eq!(
                node.flags.contains(NodeFlags::TEXT_HIDDEN),
                node.id == editing
            );
        }
    }

    #[test]
    fn first_projection_fits_and_later_ones_keep_the_transform() {
        let (tree, cfg, layout, labels) = fixture();
        let mut view = ViewState::default();
        let viewport = Size::new(800.0, 600.0);
        let scene = project(
            &tree,
            &layout,
            &labels,
            &cfg,
            viewport,
            Highlight::default(),
            &mut view,
        );
        assert!(view.fitted);
        assert_eq!(scene.transform.scale, view.transform.scale);

        // Simulate a user zoom; the next frame must not refit.
        view.transform = TranslateScale::scale(0.5);
        let scene = project(
            &tree,
            &layout,
            &labels,
            &cfg,
            viewport,
            Highlight::default(),
            &mut view,
        );
        assert_eq!(scene.transform.scale, 0.5);
    }

    #[test]
    fn branch_fills_come_from_the_palette_in_branch_order() {
        let (tree, cfg, layout, labels) = fixture();
        let mut view = ViewState::default();
        let scene = project(
            &tree,
            &layout,
            &labels,
            &cfg,
            Size::new(800.0, 600.0),
            Highlight::default(),
            &mut view,
        );
        let branches = tree.children_of(tree.root()).to_vec();
        let fill_of = |id: NodeId| {
            scene
                .nodes
                .iter()
                .find(|n| n.id == id)
                .map(|n| n.fill)
                .unwrap()
        };
        assert_eq!(fill_of(tree.root()), palette::ROOT_FILL);
        assert_eq!(fill_of(branches[0]), palette::BRANCH_PALETTE[0]);
        assert_eq!(fill_of(branches[1]), palette::BRANCH_PALETTE[1]);
        // A grandchild inherits its branch's fill.
        let grandchild = tree.children_of(branches[0])[0];
        assert_eq!(fill_of(grandchild), palette::BRANCH_PALETTE[0]);
    }

    #[test]
    fn edge_control_points_sit_at_the_horizontal_midpoint() {
        let path = link_path(Point::new(0.0, 0.0), Point::new(220.0, 90.0));
        let elements: Vec<kurbo::PathEl> = path.elements().to_vec();
        assert_eq!(elements.len(), 2);
        match elements[1] {
            kurbo::PathEl::CurveTo(c1, c2, end) => {
                assert_eq!(c1, Point::new(110.0, 0.0));
                assert_eq!(c2, Point::new(110.0, 90.0));
                assert_eq!(end, Point::new(220.0, 90.0));
            }
            ref other => panic!("expected a cubic, got {other:?}"),
        }
    }

    #[test]
    fn boxes_are_centered_with_the_configured_width() {
        let (tree, cfg, layout, labels) = fixture();
        let mut view = ViewState::default();
        let scene = project(
            &tree,
            &layout,
            &labels,
            &cfg,
            Size::new(800.0, 600.0),
            Highlight::default(),
            &mut view,
        );
        for node in &scene.nodes {
            let placed = layout.get(node.id).unwrap();
            assert_eq!(node.rect.center(), placed.pos);
            assert_eq!(node.rect.width(), cfg.box_width);
            assert_eq!(node.rect.height(), placed.box_height);
            assert_eq!(node.corner_radius, CORNER_RADIUS);
        }
    }
}
