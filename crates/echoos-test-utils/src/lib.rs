// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic stand-ins for the external collaborators.
//!
//! Each mock counts its calls so tests can assert that a code path performed
//! no I/O at all.

pub mod mock_embedder;
pub mod mock_index;
pub mod mock_provider;

pub use mock_embedder::MockEmbedder;
pub use mock_index::InMemoryIndex;
pub use mock_provider::{MockProvider, StreamScript};

/// Builds a metadata map from string pairs.
pub fn metadata(pairs: &[(&str, &str)]) -> echoos_core::VectorMetadata {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect()
}
