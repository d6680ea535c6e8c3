// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fill and stroke colors for the drawing.
//!
//! Every color the projector emits is one of a fixed set, so colors are
//! static hex strings rather than a component struct. Rasterizers parse
//! them however their backend prefers.

/// An sRGB color in CSS hex (or named) notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub &'static str);

/// Root node fill.
pub const ROOT_FILL: Color = Color("#f0e68c");

/// Fill for a node whose branch could not be determined.
pub const FALLBACK_FILL: Color = Color("#d9d9d9");

/// Fill cycle for first-level branches; every descendant inherits the fill
/// of its depth-1 ancestor.
pub const BRANCH_PALETTE: [Color; 12] = [
    Color("#8dd3c7"),
    Color("#ffffb3"),
    Color("#bebada"),
    Color("#fb8072"),
    Color("#80b1d3"),
    Color("#fdb462"),
    Color("#b3de69"),
    Color("#fccde5"),
    Color("#d9d9d9"),
    Color("#bc80bd"),
    Color("#ccebc5"),
    Color("#ffed6f"),
];

/// Box outline when a node is not selected.
pub const NODE_STROKE: Color = Color("#aaa");

/// Box outline for the selected node.
pub const SELECTED_STROKE: Color = Color("red");

/// Edge curve stroke.
pub const EDGE_STROKE: Color = Color("#adb5bd");

/// Label text fill.
pub const TEXT_FILL: Color = Color("#333");

/// Fill for a node given its depth and the index of its depth-1 ancestor
/// among the root's children.
pub fn node_fill(depth: usize, branch_index: Option<usize>) -> Color {
    if depth == 0 {
        return ROOT_FILL;
    }
    match branch_index {
        Some(i) => BRANCH_PALETTE[i % BRANCH_PALETTE.len()],
        None => FALLBACK_FILL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_always_gets_the_root_fill() {
        assert_eq!(node_fill(0, None), ROOT_FILL);
        assert_eq!(node_fill(0, Some(3)), ROOT_FILL);
    }

    #[test]
    fn palette_wraps_after_twelve_branches() {
        assert_eq!(node_fill(1, Some(0)), node_fill(1, Some(12)));
        assert_eq!(node_fill(2, Some(5)), BRANCH_PALETTE[5]);
    }

    #[test]
    fn missing_branch_falls_back_to_gray() {
        assert_eq!(node_fill(3, None), FALLBACK_FILL);
    }
}
