// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Model: the labeled mind-map tree.
//!
//! This crate owns the in-memory tree that every other Canopy crate derives
//! from. Nodes live in a generational slot arena and are addressed by
//! [`NodeId`] everywhere — layout, scene, and controller never hold
//! references into the tree, so a structural edit can never leave another
//! component with a dangling pointer. A stale id is simply no longer
//! [alive](MindTree::is_alive).
//!
//! ## Structure
//!
//! - [`MindTree`]: the arena plus the root id. Built from boundary JSON with
//!   [`MindTree::normalize`] and serialized back with [`MindTree::to_value`].
//! - [`NodeId`]: generational handle `(slot, generation)`; slot reuse bumps
//!   the generation so removed nodes stay detectably dead.
//! - [`TreeError`]: schema rejection, stale-id lookups, and the root-removal
//!   refusal.
//!
//! ## Mutation surface
//!
//! Mutations only append or remove, never re-parent across branches, so the
//! structure is acyclic by construction:
//!
//! - [`MindTree::insert_child`] appends a new leaf.
//! - [`MindTree::remove_subtree`] removes a node and its descendants
//!   (refused for the root).
//! - [`MindTree::rename`] trims and renames in place; empty or unchanged
//!   labels are a no-op.
//! - [`MindTree::append_expansion`] appends externally supplied leaves.
//!
//! Normalization, removal, and traversal walk the tree with explicit stacks
//! so pathological inputs cannot overflow the call stack.

mod tree;
mod types;

pub use tree::MindTree;
pub use types::{NodeId, TreeError};
