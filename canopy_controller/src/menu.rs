// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context menu placement.

use kurbo::{Point, Rect, Size};

/// Gap between the node box and the menu, and the minimum left inset.
pub const MENU_MARGIN: f64 = 8.0;

/// Place the menu next to a node's screen-space box.
///
/// The menu prefers the node's top-right corner. If it would overflow the
/// right edge it flips to the left side; if it would overflow the bottom it
/// flips up to end at the box's bottom edge. After flipping, the position
/// is clamped so the top is never negative and the left never closer than
/// the margin.
pub fn place_menu(node_rect: Rect, menu: Size, viewport: Size) -> Point {
    let mut left = node_rect.x1 + MENU_MARGIN;
    let mut top = node_rect.y0;
    if left + menu.width > viewport.width {
        left = node_rect.x0 - menu.width - MENU_MARGIN;
    }
    if top + menu.height > viewport.height {
        top = node_rect.y1 - menu.height;
    }
    if top < 0.0 {
        top = 0.0;
    }
    if left < 0.0 {
        left = MENU_MARGIN;
    }
    Point::new(left, top)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(800.0, 600.0);
    const MENU: Size = Size::new(160.0, 120.0);

    #[test]
    fn prefers_the_top_right_corner() {
        let node = Rect::new(100.0, 100.0, 250.0, 160.0);
        let p = place_menu(node, MENU, VIEWPORT);
        assert_eq!(p, Point::new(250.0 + MENU_MARGIN, 100.0));
    }

    #[test]
    fn flips_left_when_the_right_edge_overflows() {
        let node = Rect::new(700.0, 100.0, 790.0, 160.0);
        let p = place_menu(node, MENU, VIEWPORT);
        assert_eq!(p.x, 700.0 - MENU.width - MENU_MARGIN);
        assert_eq!(p.y, 100.0);
    }

    #[test]
    fn flips_up_when_the_bottom_edge_overflows() {
        let node = Rect::new(100.0, 550.0, 250.0, 590.0);
        let p = place_menu(node, MENU, VIEWPORT);
        assert_eq!(p.y, 590.0 - MENU.height);
    }

    #[test]
    fn clamps_to_the_viewport_origin() {
        // A box hanging off the top-left after flipping both ways.
        let node = Rect::new(-300.0, -200.0, -100.0, -150.0);
        let p = place_menu(node, Size::new(900.0, 700.0), VIEWPORT);
        assert_eq!(p.x, MENU_MARGIN);
        assert_eq!(p.y, 0.0);
    }
}
