// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter producing bag-of-characters vectors.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use echoos_core::traits::{EmbeddingAdapter, PluginAdapter};
use echoos_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};
use echoos_core::EchoError;

/// Dimension of every vector the mock produces.
pub const MOCK_DIMENSIONS: usize = 16;

/// Embeds text by counting lowercase letters into buckets.
///
/// Identical texts get identical vectors and texts sharing words score
/// higher than unrelated ones.
#[derive(Default)]
pub struct MockEmbedder {
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// An embedder whose every call fails with a provider error.
    pub fn failing() -> Self {
        let embedder = Self::new();
        embedder.set_failing(true);
        embedder
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `embed` calls that reached the mock.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The vector this mock assigns to `text`.
    pub fn vector_for(text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; MOCK_DIMENSIONS];
        for c in text.to_lowercase().chars().filter(|c| c.is_alphanumeric()) {
            v[(c as usize) % MOCK_DIMENSIONS] += 1.0;
        }
        // Keep the empty string away from the zero vector.
        v[0] += 0.01;
        v
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, EchoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EchoError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, EchoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(EchoError::Provider {
                message: "mock embedder unavailable".into(),
                source: None,
            });
        }
        Ok(EmbeddingOutput {
            embeddings: input.texts.iter().map(|t| Self::vector_for(t)).collect(),
        })
    }
}
