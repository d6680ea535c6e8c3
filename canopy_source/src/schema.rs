// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire schema and the two source traits.

use serde::{Deserialize, Serialize};

/// One node as it appears on the wire.
///
/// Generation payloads use `topic` for the root and `name` for everything
/// else; normalization tolerates either on the root.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RawNode {
    /// Node label for non-root nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Root label in generation payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Child nodes; absent means leaf.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
}

/// One suggested child in an expansion payload.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ExpandItem {
    /// Label for the suggested child.
    pub name: String,
}

/// Inputs for generating a fresh map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateRequest {
    /// The topic the map is about.
    pub topic: String,
    /// Whether the source should produce deeper detail nodes.
    pub include_details: bool,
}

/// Inputs for expanding one node in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandRequest {
    /// Label of the node being expanded.
    pub node_name: String,
    /// Label of its parent, empty for branches of the root.
    pub parent_context: String,
    /// Label of the root, for topical grounding.
    pub root_context: String,
}

/// A source failure whose message is surfaced to the user verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceError {
    /// Human-readable description of what went wrong.
    pub message: String,
}

impl SourceError {
    /// Wrap a message into an error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl core::fmt::Display for SourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SourceError {}

/// Produces a whole map for a topic.
pub trait GenerationSource {
    /// Return the wire-schema tree for `request`, recovered if necessary
    /// (implementations typically finish with
    /// [`recover_node`](crate::recover_node)).
    fn generate(&self, request: &GenerateRequest) -> Result<RawNode, SourceError>;
}

/// Produces child suggestions for an existing node.
pub trait ExpansionSource {
    /// Return suggested children for `request`, in order.
    fn expand(&self, request: &ExpandRequest) -> Result<Vec<ExpandItem>, SourceError>;
}
