// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context retrieval for prompt augmentation.

use std::sync::Arc;

use echoos_core::traits::VectorIndexAdapter;
use echoos_core::types::{RetrievalResult, VectorMatch};
use echoos_core::EchoError;
use tracing::{debug, warn};

use crate::vectorizer::TextVectorizer;

/// Separator between context fragments.
const FRAGMENT_SEPARATOR: &str = "\n\n";

/// Composes the vectorizer and the vector index into a context string.
#[derive(Clone)]
pub struct RetrievalOrchestrator {
    vectorizer: TextVectorizer,
    index: Arc<dyn VectorIndexAdapter>,
}

impl RetrievalOrchestrator {
    pub fn new(vectorizer: TextVectorizer, index: Arc<dyn VectorIndexAdapter>) -> Self {
        Self { vectorizer, index }
    }

    /// Embeds `query` and returns the `k` nearest matches.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<RetrievalResult, EchoError> {
        let vector = self.vectorizer.embed_one(query).await?;
        self.index.query(vector, k).await
    }

    /// Text of the `k` nearest matches joined by blank lines, in rank order.
    ///
    /// Never fails. Any embedding or index error yields the empty string,
    /// as does a result with no text-bearing matches.
    pub async fn build_context(&self, query: &str, k: usize) -> String {
        match self.retrieve(query, k).await {
            Ok(matches) => {
                let context = join_context(&matches);
                debug!(matches = matches.len(), context_len = context.len(), "context built");
                context
            }
            Err(e) => {
                warn!(error = %e, "retrieval failed, continuing without context");
                String::new()
            }
        }
    }
}

/// Joins the `text` metadata of each match, skipping matches without text.
pub fn join_context(matches: &[VectorMatch]) -> String {
    matches
        .iter()
        .filter_map(VectorMatch::text)
        .collect::<Vec<_>>()
        .join(FRAGMENT_SEPARATOR)
}
