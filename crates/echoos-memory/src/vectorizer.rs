// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text to vector conversion over an embedding provider.

use std::sync::Arc;

use echoos_core::traits::EmbeddingAdapter;
use echoos_core::types::EmbeddingInput;
use echoos_core::EchoError;

/// Wraps an [`EmbeddingAdapter`] with the batch contract the pipeline relies on.
///
/// No retries happen here. Callers decide whether a failure is fatal.
#[derive(Clone)]
pub struct TextVectorizer {
    embedder: Arc<dyn EmbeddingAdapter>,
}

impl TextVectorizer {
    pub fn new(embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        Self { embedder }
    }

    /// One vector per text, in input order. An empty batch never reaches the provider.
    pub async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EchoError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let expected = texts.len();
        let output = self.embedder.embed(EmbeddingInput { texts }).await?;
        if output.embeddings.len() != expected {
            return Err(EchoError::Provider {
                message: format!(
                    "{} returned {} vectors for {expected} texts",
                    self.embedder.name(),
                    output.embeddings.len()
                ),
                source: None,
            });
        }
        Ok(output.embeddings)
    }

    /// Embeds a single text.
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, EchoError> {
        self.embed(vec![text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| EchoError::Internal("embedding batch of one came back empty".into()))
    }
}
