// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout passes: tidy placement, bidirectional splitting, viewport fit.

use canopy_model::{MindTree, NodeId};
use kurbo::{Point, Rect, Size, TranslateScale, Vec2};

use crate::types::{Edge, Layout, LayoutConfig, LayoutNode, Side};

/// Vertical margin added around the drawing when fitting the viewport.
const FIT_V_MARGIN: f64 = 50.0;

/// Compute a placement for every live node.
///
/// `height_of` must return the box height for any live node; heights are a
/// pure function of the label (see `canopy_text`), so they are known before
/// any position is assigned and feed straight into vertical separation.
pub fn compute<F>(tree: &MindTree, cfg: &LayoutConfig, height_of: F) -> Layout
where
    F: Fn(NodeId) -> f64,
{
    let root = tree.root();
    let branches = tree.children_of(root).to_vec();
    let mut layout = Layout::default();

    if branches.is_empty() {
        // A lone topic lays out as a single centered node; no pass needed.
        layout.nodes.insert(
            root,
            LayoutNode {
                id: root,
                depth: 0,
                pos: Point::ZERO,
                side: Side::Center,
                box_height: height_of(root),
                parent: None,
            },
        );
        return layout;
    }

    layout.nodes.insert(
        root,
        LayoutNode {
            id: root,
            depth: 0,
            pos: Point::ZERO,
            side: Side::Center,
            box_height: height_of(root),
            parent: None,
        },
    );
    for &branch in &branches {
        layout.edges.push(Edge {
            source: root,
            target: branch,
        });
    }

    if cfg.bidirectional {
        // First ceil(n/2) branches go left, the rest right, original order
        // preserved within each half. For n = 1 the lone branch goes left.
        let mid = branches.len().div_ceil(2);
        place_half(tree, cfg, &height_of, &branches[..mid], Side::Left, &mut layout);
        place_half(tree, cfg, &height_of, &branches[mid..], Side::Right, &mut layout);
    } else {
        place_half(tree, cfg, &height_of, &branches, Side::Center, &mut layout);
    }

    layout
}

/// Lay out one half-tree (or, in standard mode, the whole forest of
/// branches) against a synthetic root pinned at the origin.
fn place_half<F>(
    tree: &MindTree,
    cfg: &LayoutConfig,
    height_of: &F,
    branches: &[NodeId],
    side: Side,
    layout: &mut Layout,
) where
    F: Fn(NodeId) -> f64,
{
    if branches.is_empty() {
        return;
    }

    // Pre-order over an explicit stack; reversing it later gives a
    // children-before-parent order for the centering pass.
    let mut order: Vec<(NodeId, usize)> = Vec::new();
    let mut stack: Vec<(NodeId, usize)> = branches.iter().rev().map(|&b| (b, 1)).collect();
    while let Some((id, depth)) = stack.pop() {
        order.push((id, depth));
        for &child in tree.children_of(id).iter().rev() {
            stack.push((child, depth + 1));
        }
        for &child in tree.children_of(id) {
            layout.edges.push(Edge {
                source: id,
                target: child,
            });
        }
    }

    // Pass 1: leaves advance a cursor; the separation honors both the
    // spacing floor and the two boxes' actual heights.
    let mut ys: hashbrown::HashMap<NodeId, f64> = hashbrown::HashMap::new();
    let mut prev_leaf: Option<(f64, f64)> = None; // (y, height)
    for &(id, _) in &order {
        if tree.children_of(id).is_empty() {
            let h = height_of(id);
            let y = match prev_leaf {
                None => 0.0,
                Some((py, ph)) => py + (cfg.v_spacing).max(ph / 2.0 + h / 2.0 + cfg.box_gap),
            };
            ys.insert(id, y);
            prev_leaf = Some((y, h));
        }
    }

    // Pass 2, children before parents: push sibling subtrees apart until
    // their boxes clear each other, then center the parent over the span.
    // The leaf cursor only separated leaves, so a tall parent box can still
    // crowd the sibling above it; the deficit shifts its whole subtree.
    for &(id, _) in order.iter().rev() {
        let children = tree.children_of(id);
        if children.is_empty() {
            continue;
        }
        separate_siblings(tree, cfg, height_of, children, &mut ys);
        let first = ys[&children[0]];
        let last = ys[&children[children.len() - 1]];
        ys.insert(id, (first + last) / 2.0);
    }

    // The half's branches are siblings of each other too (children of the
    // true root), so they get the same clearance.
    separate_siblings(tree, cfg, height_of, branches, &mut ys);

    // The synthetic root sits at the center of its branch span; shifting by
    // that center pins the true root at y = 0 between the halves.
    let span_center = (ys[&branches[0]] + ys[&branches[branches.len() - 1]]) / 2.0;

    for &(id, synth_depth) in &order {
        // In bidirectional mode the half-trees sit one extra h_spacing away
        // from the root; in standard mode depth alone sets the column.
        let distance = match side {
            Side::Center => synth_depth as f64 * cfg.h_spacing,
            Side::Left | Side::Right => (synth_depth as f64 + 1.0) * cfg.h_spacing,
        };
        let x = if side == Side::Left { -distance } else { distance };
        layout.nodes.insert(
            id,
            LayoutNode {
                id,
                depth: synth_depth,
                pos: Point::new(x, ys[&id] - span_center),
                side,
                box_height: height_of(id),
                parent: tree.parent_of(id),
            },
        );
    }
}

/// Walk `siblings` in order and shift each one's whole subtree down by
/// whatever it takes for its box to clear the box before it.
fn separate_siblings<F>(
    tree: &MindTree,
    cfg: &LayoutConfig,
    height_of: &F,
    siblings: &[NodeId],
    ys: &mut hashbrown::HashMap<NodeId, f64>,
) where
    F: Fn(NodeId) -> f64,
{
    let mut prev: Option<(f64, f64)> = None;
    for &sibling in siblings {
        let h = height_of(sibling);
        if let Some((prev_y, prev_h)) = prev {
            let min_y = prev_y + (cfg.v_spacing).max(prev_h / 2.0 + h / 2.0 + cfg.box_gap);
            let deficit = min_y - ys[&sibling];
            if deficit > 0.0 {
                for desc in tree.descendants(sibling) {
                    if let Some(y) = ys.get_mut(&desc) {
                        *y += deficit;
                    }
                }
            }
        }
        prev = Some((ys[&sibling], h));
    }
}

/// The once-per-load transform that fits the whole drawing in the viewport.
///
/// The bounding box over node positions is expanded by half a box width
/// horizontally and a fixed margin vertically; the scale is the largest
/// value ≤ 1 that fits both dimensions, and the translation centers the box.
pub fn fit_to_viewport(layout: &Layout, cfg: &LayoutConfig, viewport: Size) -> TranslateScale {
    let mut bounds: Option<Rect> = None;
    for node in layout.nodes.values() {
        let r = Rect::from_center_size(node.pos, Size::ZERO);
        bounds = Some(match bounds {
            None => r,
            Some(b) => b.union(r),
        });
    }
    let Some(bounds) = bounds else {
        return TranslateScale::new(Vec2::ZERO, 1.0);
    };
    let bounds = bounds.inflate(cfg.box_width / 2.0, FIT_V_MARGIN);

    let scale_x = if bounds.width() > 0.0 {
        viewport.width / bounds.width()
    } else {
        1.0
    };
    let scale_y = if bounds.height() > 0.0 {
        viewport.height / bounds.height()
    } else {
        1.0
    };
    let scale = scale_x.min(scale_y).min(1.0);

    let tx = (viewport.width - bounds.width() * scale) / 2.0 - bounds.x0 * scale;
    let ty = (viewport.height - bounds.height() * scale) / 2.0 - bounds.y0 * scale;
    TranslateScale::new(Vec2::new(tx, ty), scale)
}
