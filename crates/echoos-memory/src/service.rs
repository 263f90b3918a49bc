// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory save, search, list, forget, and reindex.
//!
//! The durable store is the source of truth. A record's vector entry shares
//! its id and is written after the record commits, so the index may lag the
//! store. A failed index delete in `forget` leaves an orphaned vector entry
//! behind; its metadata still names the removed record.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use echoos_core::traits::VectorIndexAdapter;
use echoos_core::types::{RetrievalResult, VectorMetadata};
use echoos_core::EchoError;
use echoos_storage::{MemoryRecord, MemoryStore, NewMemory, DEFAULT_EMOTION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::recording::record_sync_failure;
use crate::vectorizer::TextVectorizer;

/// Records embedded per provider call during reindex.
const REINDEX_BATCH: usize = 64;

/// A memory as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryInput {
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub emotion: Option<String>,
    /// RFC 3339, or naive ISO-8601 read as UTC. Absent means now.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Acknowledgement returned once the record is durable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveReceipt {
    pub id: String,
    pub status: &'static str,
}

/// Where phase 2 of a save ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    Indexed,
    /// The record is durable but has no vector entry yet.
    Deferred(String),
}

/// A save whose record has committed and whose vector entry is pending.
///
/// Phase 1 ([`SaveOperation::commit`]) failing fails the save. Phase 2
/// ([`SaveOperation::sync_vector`]) never fails the save; a logged
/// [`IndexOutcome::Deferred`] is repaired by [`MemoryService::reindex`].
#[derive(Debug)]
pub struct SaveOperation {
    record: MemoryRecord,
}

impl SaveOperation {
    pub async fn commit(store: &MemoryStore, memory: NewMemory) -> Result<Self, EchoError> {
        let record = store.insert(memory).await?;
        debug!(memory_id = %record.id, user_id = %record.user_id, "memory committed");
        Ok(Self { record })
    }

    pub fn record(&self) -> &MemoryRecord {
        &self.record
    }

    /// Embeds the record text and upserts it under the record id.
    pub async fn sync_vector(
        self,
        vectorizer: &TextVectorizer,
        index: &dyn VectorIndexAdapter,
    ) -> (MemoryRecord, IndexOutcome) {
        let records = std::slice::from_ref(&self.record);
        let outcome = match upsert_records(vectorizer, index, records).await {
            Ok(_) => IndexOutcome::Indexed,
            Err(e) => {
                warn!(
                    memory_id = %self.record.id,
                    error = %e,
                    "vector upsert failed, record saved without index entry"
                );
                record_sync_failure("upsert");
                IndexOutcome::Deferred(e.to_string())
            }
        };
        (self.record, outcome)
    }
}

/// Metadata stored alongside a record's vector.
pub fn vector_metadata(record: &MemoryRecord) -> VectorMetadata {
    let mut meta = VectorMetadata::new();
    meta.insert("text".into(), Value::String(record.text.clone()));
    meta.insert(
        "tags".into(),
        Value::Array(record.tags.iter().cloned().map(Value::String).collect()),
    );
    meta.insert("emotion".into(), Value::String(record.emotion.clone()));
    meta.insert("user_id".into(), Value::String(record.user_id.clone()));
    meta.insert("memory_id".into(), Value::String(record.id.clone()));
    meta
}

async fn upsert_records(
    vectorizer: &TextVectorizer,
    index: &dyn VectorIndexAdapter,
    records: &[MemoryRecord],
) -> Result<usize, EchoError> {
    let vectors = vectorizer
        .embed(records.iter().map(|r| r.text.clone()).collect())
        .await?;
    index
        .upsert(
            records.iter().map(|r| r.id.clone()).collect(),
            vectors,
            records.iter().map(vector_metadata).collect(),
        )
        .await
}

/// Parses a client-supplied event time.
pub fn parse_event_time(raw: &str) -> Result<DateTime<Utc>, EchoError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| EchoError::Validation(format!("invalid timestamp: {raw}")))
}

/// Memory operations exposed to the gateway and the CLI.
#[derive(Clone)]
pub struct MemoryService {
    store: MemoryStore,
    vectorizer: TextVectorizer,
    index: Arc<dyn VectorIndexAdapter>,
}

impl MemoryService {
    pub fn new(
        store: MemoryStore,
        vectorizer: TextVectorizer,
        index: Arc<dyn VectorIndexAdapter>,
    ) -> Self {
        Self {
            store,
            vectorizer,
            index,
        }
    }

    /// Persists a memory, then indexes it best-effort.
    pub async fn save(&self, owner: &str, input: MemoryInput) -> Result<SaveReceipt, EchoError> {
        if input.text.trim().is_empty() {
            return Err(EchoError::Validation("memory text must not be empty".into()));
        }
        let timestamp = input.timestamp.as_deref().map(parse_event_time).transpose()?;
        let memory = NewMemory {
            user_id: owner.to_string(),
            text: input.text,
            tags: input.tags,
            emotion: input
                .emotion
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EMOTION.to_string()),
            timestamp,
        };

        let operation = SaveOperation::commit(&self.store, memory).await?;
        let (record, _) = operation
            .sync_vector(&self.vectorizer, self.index.as_ref())
            .await;

        Ok(SaveReceipt {
            id: record.id,
            status: "saved",
        })
    }

    /// Nearest index matches for `query`.
    ///
    /// Provider and index failures degrade to an empty result.
    /// Configuration errors are returned.
    pub async fn search(&self, query: &str, limit: usize) -> Result<RetrievalResult, EchoError> {
        let result = match self.vectorizer.embed_one(query).await {
            Ok(vector) => self.index.query(vector, limit).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(matches) => Ok(matches),
            Err(e @ EchoError::Config(_)) => Err(e),
            Err(e) => {
                warn!(error = %e, "memory search failed, returning no matches");
                Ok(Vec::new())
            }
        }
    }

    /// The owner's most recent records, newest first.
    pub async fn list(&self, owner: &str, limit: usize) -> Result<Vec<MemoryRecord>, EchoError> {
        self.store.list_by_owner(owner, limit).await
    }

    /// Deletes one of the owner's records and, best-effort, its vector entry.
    pub async fn forget(&self, owner: &str, id: &str) -> Result<(), EchoError> {
        if !self.store.delete(owner, id).await? {
            return Err(EchoError::NotFound(format!("Memory not found: {id}")));
        }
        if let Err(e) = self.index.delete(vec![id.to_string()]).await {
            warn!(memory_id = %id, error = %e, "vector delete failed, index entry is orphaned");
            record_sync_failure("delete");
        }
        Ok(())
    }

    /// Re-embeds and re-upserts every record of `owner`. Returns the count accepted.
    pub async fn reindex(&self, owner: &str) -> Result<usize, EchoError> {
        let records = self.store.all_for_owner(owner).await?;
        let mut accepted = 0;
        for batch in records.chunks(REINDEX_BATCH) {
            accepted += upsert_records(&self.vectorizer, self.index.as_ref(), batch).await?;
        }
        info!(user_id = %owner, records = records.len(), accepted, "reindex complete");
        Ok(accepted)
    }
}
