// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Source: the boundary to external map generators.
//!
//! Canopy itself never talks HTTP. Hosts implement [`GenerationSource`] and
//! [`ExpansionSource`] over whatever transport they have; this crate pins
//! the wire schema ([`RawNode`], [`ExpandItem`]) and the best-effort JSON
//! recovery that makes noisy responses usable (see [`recover_object`] and
//! [`recover_array`]).
//!
//! Every failure crossing this boundary is a [`SourceError`] whose message
//! is shown to the user verbatim.

mod recover;
mod schema;

pub use recover::{recover_array, recover_array_or_empty, recover_node, recover_object};
pub use schema::{
    ExpandItem, ExpandRequest, ExpansionSource, GenerateRequest, GenerationSource, RawNode,
    SourceError,
};
