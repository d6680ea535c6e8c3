// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Scene turns a laid-out mind map into drawable primitives.
//!
//! The projector is a pure function from tree + layout + sized labels to a
//! [`Scene`] of rounded boxes and horizontal Bézier connectors, in paint
//! order, with fills assigned per branch from a fixed palette. It knows
//! nothing about any particular raster or vector backend; hosts walk the
//! scene and draw with whatever they have.
//!
//! The one piece of state here is [`ViewState`], which remembers the
//! user's pan/zoom transform and whether the once-per-load fit to the
//! viewport has run.

mod palette;
mod project;

pub use palette::{
    BRANCH_PALETTE, Color, EDGE_STROKE, FALLBACK_FILL, NODE_STROKE, ROOT_FILL, SELECTED_STROKE,
    TEXT_FILL, node_fill,
};
pub use project::{
    CORNER_RADIUS, EDGE_STROKE_WIDTH, EdgeCurve, Highlight, NODE_STROKE_WIDTH, NodeBox, NodeFlags,
    SELECTED_STROKE_WIDTH, Scene, ViewState, link_path, project,
};
