// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Controller: the interaction state machine over a mind map.
//!
//! A [`Session`] owns the tree, the cached layout, and the view transform,
//! and drives all of them from host input. The machine is event-in,
//! effect-out: the host feeds [`Event`]s into [`Session::handle`] and acts
//! on the returned [`Effect`]s in order. Nothing here blocks; long-running
//! exploration is handed to the host as an [`Effect::StartExplore`] with a
//! ticket, and its result comes back through
//! [`Session::complete_explore`], where stale tickets and since-removed
//! target nodes are dropped with a diagnostic rather than misapplied.
//!
//! Failures never leave the session half-updated: a refused removal, a
//! failed exploration, or a no-op rename all keep the last good tree and
//! layout, and surface as [`Effect::Notify`].

mod menu;
mod session;

pub use menu::{MENU_MARGIN, place_menu};
pub use session::{
    EditModel, Effect, Event, ExploreTicket, MAX_SCALE, MIN_SCALE, MenuModel, Session,
};
