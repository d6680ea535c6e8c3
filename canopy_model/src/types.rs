// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the tree model: node identifiers and errors.

use core::fmt;

/// Identifier for a node in the tree (generational).
///
/// A `NodeId` stays valid across unrelated edits and becomes detectably
/// stale once its node is removed: the slot may be reused, but only with a
/// higher generation, and [`crate::MindTree::is_alive`] checks both parts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Failures raised by tree construction and structural edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The boundary JSON was not usable as a tree (not an object, or a node
    /// without a usable label field).
    Schema(String),
    /// A mutation referenced a node that is no longer present.
    NotFound,
    /// Removing the root was requested. Refused with no state change.
    RootRemoval,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(msg) => write!(f, "unusable tree JSON: {msg}"),
            Self::NotFound => write!(f, "node is no longer present in the tree"),
            Self::RootRemoval => write!(f, "the root node cannot be removed"),
        }
    }
}

impl std::error::Error for TreeError {}
