// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector index adapter trait for similarity search services.

use async_trait::async_trait;

use crate::error::EchoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{RetrievalResult, VectorMetadata};

/// Adapter for a vector similarity index.
///
/// The logical index is resolved from configuration, never per call.
/// Upsert is idempotent on id: a second upsert of the same id replaces both
/// the vector and its metadata.
#[async_trait]
pub trait VectorIndexAdapter: PluginAdapter {
    /// Writes a batch of entries and returns how many the index accepted.
    ///
    /// The three sequences must have equal length. Implementations check this
    /// with [`validate_batch`] before any network call.
    async fn upsert(
        &self,
        ids: Vec<String>,
        vectors: Vec<Vec<f32>>,
        metadata: Vec<VectorMetadata>,
    ) -> Result<usize, EchoError>;

    /// Returns at most `top_k` matches with metadata, best first.
    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<RetrievalResult, EchoError>;

    /// Removes entries by id. Unknown ids are ignored.
    async fn delete(&self, ids: Vec<String>) -> Result<(), EchoError>;
}

/// Checks that an upsert batch has one vector and one metadata map per id.
pub fn validate_batch(
    ids: &[String],
    vectors: &[Vec<f32>],
    metadata: &[VectorMetadata],
) -> Result<(), EchoError> {
    if ids.len() != vectors.len() || ids.len() != metadata.len() {
        return Err(EchoError::Validation(format!(
            "upsert batch length mismatch: {} ids, {} vectors, {} metadata entries",
            ids.len(),
            vectors.len(),
            metadata.len()
        )));
    }
    Ok(())
}
