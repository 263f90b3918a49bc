// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for text-to-vector conversion.

use async_trait::async_trait;

use crate::error::EchoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{EmbeddingInput, EmbeddingOutput};

/// Adapter for an embedding provider.
///
/// Implementations must return exactly one vector per input text, in input
/// order. They do not retry.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Generates embeddings for the given input.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, EchoError>;
}
