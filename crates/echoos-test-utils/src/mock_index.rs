// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory vector index with cosine similarity.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use echoos_core::traits::{validate_batch, PluginAdapter, VectorIndexAdapter};
use echoos_core::types::{AdapterType, HealthStatus, RetrievalResult, VectorMatch, VectorMetadata};
use echoos_core::EchoError;

/// A vector index held in a `HashMap`, with call counters and a failure switch.
#[derive(Default)]
pub struct InMemoryIndex {
    entries: Mutex<HashMap<String, (Vec<f32>, VectorMetadata)>>,
    upserts: AtomicUsize,
    queries: AtomicUsize,
    deletes: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a provider error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn upsert_calls(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Total calls of any kind.
    pub fn calls(&self) -> usize {
        self.upsert_calls() + self.query_calls() + self.delete_calls()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// The stored vector and metadata for `id`.
    pub async fn entry(&self, id: &str) -> Option<(Vec<f32>, VectorMetadata)> {
        self.entries.lock().await.get(id).cloned()
    }

    fn check_failing(&self) -> Result<(), EchoError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EchoError::Provider {
                message: "mock index unavailable".into(),
                source: None,
            });
        }
        Ok(())
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl PluginAdapter for InMemoryIndex {
    fn name(&self) -> &str {
        "in-memory-index"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::VectorIndex
    }

    async fn health_check(&self) -> Result<HealthStatus, EchoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EchoError> {
        Ok(())
    }
}

#[async_trait]
impl VectorIndexAdapter for InMemoryIndex {
    async fn upsert(
        &self,
        ids: Vec<String>,
        vectors: Vec<Vec<f32>>,
        metadata: Vec<VectorMetadata>,
    ) -> Result<usize, EchoError> {
        validate_batch(&ids, &vectors, &metadata)?;
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;

        let mut entries = self.entries.lock().await;
        let count = ids.len();
        for ((id, vector), meta) in ids.into_iter().zip(vectors).zip(metadata) {
            entries.insert(id, (vector, meta));
        }
        Ok(count)
    }

    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<RetrievalResult, EchoError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;

        let entries = self.entries.lock().await;
        let mut matches: Vec<VectorMatch> = entries
            .iter()
            .map(|(id, (v, meta))| VectorMatch {
                id: id.clone(),
                score: cosine(&vector, v),
                metadata: meta.clone(),
            })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn delete(&self, ids: Vec<String>) -> Result<(), EchoError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;

        let mut entries = self.entries.lock().await;
        for id in ids {
            entries.remove(&id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata;

    #[tokio::test]
    async fn upsert_same_id_keeps_second_write() {
        let index = InMemoryIndex::new();
        index
            .upsert(vec!["m".into()], vec![vec![1.0, 0.0]], vec![metadata(&[("text", "first")])])
            .await
            .unwrap();
        index
            .upsert(vec!["m".into()], vec![vec![0.0, 1.0]], vec![metadata(&[("text", "second")])])
            .await
            .unwrap();

        assert_eq!(index.len().await, 1);
        let hits = index.query(vec![0.0, 1.0], 5).await.unwrap();
        assert_eq!(hits[0].text(), Some("second"));
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn query_ranks_by_similarity_and_truncates() {
        let index = InMemoryIndex::new();
        index
            .upsert(
                vec!["near".into(), "far".into(), "mid".into()],
                vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
                vec![VectorMetadata::new(); 3],
            )
            .await
            .unwrap();

        let hits = index.query(vec![1.0, 0.0], 2).await.unwrap();
        let ids: Vec<&str> = hits.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
    }

    #[tokio::test]
    async fn mismatched_batch_is_not_counted() {
        let index = InMemoryIndex::new();
        let err = index
            .upsert(vec!["a".into()], vec![], vec![VectorMetadata::new()])
            .await
            .unwrap_err();
        assert!(matches!(err, EchoError::Validation(_)));
        assert_eq!(index.calls(), 0);
    }
}
