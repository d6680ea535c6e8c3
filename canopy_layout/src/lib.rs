// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Layout: collision-free positions for every node of a mind map.
//!
//! Given the tree shape and a box height per node, the engine assigns every
//! node a position in an abstract plane such that sibling boxes never
//! overlap. Horizontal position is a function of depth; vertical position
//! comes from a tidy-tree pass that places leaves on a cursor with a spacing
//! floor and centers each parent over its children's span.
//!
//! ## Bidirectional mode
//!
//! A mind map reads better when branches spread to both sides of the topic
//! instead of growing only rightward. With [`LayoutConfig::bidirectional`]
//! set and a root that has children, the first `ceil(n/2)` branches go to
//! the left half-tree and the rest to the right, preserving original order
//! within each half. Each half is laid out independently against a synthetic
//! root, then mirrored/offset with the true root pinned at the origin.
//!
//! Box heights are computed *before* layout (they are a pure function of the
//! label and the box width, see `canopy_text`) and feed directly into the
//! vertical separation, so variable-height siblings keep their clearance.
//!
//! [`fit_to_viewport`] produces the one-time [`kurbo::TranslateScale`] that
//! makes the whole drawing visible on first render.

mod engine;
mod types;

pub use engine::{compute, fit_to_viewport};
pub use types::{Edge, Layout, LayoutConfig, LayoutNode, Side};
