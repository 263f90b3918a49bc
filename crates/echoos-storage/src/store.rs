// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed store of memory records.
//!
//! This is the source of truth for saved memories. It never talks to the
//! vector index; keeping the two in step is the memory service's job.

use chrono::Utc;
use echoos_core::EchoError;
use rusqlite::types::Type;
use rusqlite::OptionalExtension;
use tracing::debug;

use crate::database::{storage_err, Database};
use crate::models::{format_timestamp, parse_timestamp, MemoryRecord, NewMemory};

const SELECT_COLUMNS: &str = "SELECT id, user_id, text, tags, emotion, timestamp, created_at FROM memories";

/// Durable store for [`MemoryRecord`]s.
#[derive(Clone)]
pub struct MemoryStore {
    db: Database,
}

impl MemoryStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Inserts a record with a fresh id and creation time.
    ///
    /// Not idempotent: calling twice with the same input stores two records.
    pub async fn insert(&self, memory: NewMemory) -> Result<MemoryRecord, EchoError> {
        let now = Utc::now();
        let record = MemoryRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: memory.user_id,
            text: memory.text,
            tags: memory.tags,
            emotion: memory.emotion,
            timestamp: memory.timestamp.unwrap_or(now),
            created_at: now,
        };

        let tags_json = serde_json::to_string(&record.tags).map_err(|e| EchoError::Storage {
            source: Box::new(e),
        })?;
        let params = (
            record.id.clone(),
            record.user_id.clone(),
            record.text.clone(),
            tags_json,
            record.emotion.clone(),
            format_timestamp(&record.timestamp),
            format_timestamp(&record.created_at),
        );

        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO memories (id, user_id, text, tags, emotion, timestamp, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    rusqlite::params![params.0, params.1, params.2, params.3, params.4, params.5, params.6],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;

        debug!(id = %record.id, user_id = %record.user_id, "memory record inserted");
        Ok(record)
    }

    /// The owner's most recent records by event timestamp, newest first.
    pub async fn list_by_owner(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, EchoError> {
        let user_id = user_id.to_string();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.db
            .connection()
            .call(move |conn| -> Result<Vec<MemoryRecord>, rusqlite::Error> {
                let mut stmt = conn.prepare(&format!(
                    "{SELECT_COLUMNS} WHERE user_id = ?1 ORDER BY timestamp DESC, created_at DESC LIMIT ?2"
                ))?;
                let records = stmt
                    .query_map(rusqlite::params![user_id, limit], row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await
            .map_err(storage_err)
    }

    /// Every record the owner has, newest first.
    pub async fn all_for_owner(&self, user_id: &str) -> Result<Vec<MemoryRecord>, EchoError> {
        self.list_by_owner(user_id, usize::MAX).await
    }

    /// Looks a record up by id.
    pub async fn get(&self, id: &str) -> Result<Option<MemoryRecord>, EchoError> {
        let id = id.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<Option<MemoryRecord>, rusqlite::Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
                let record = stmt
                    .query_row(rusqlite::params![id], row_to_record)
                    .optional()?;
                Ok(record)
            })
            .await
            .map_err(storage_err)
    }

    /// Deletes the owner's record. Returns `false` when no such record exists.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<bool, EchoError> {
        let user_id = user_id.to_string();
        let id = id.to_string();
        let removed = self
            .db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute(
                    "DELETE FROM memories WHERE id = ?1 AND user_id = ?2",
                    rusqlite::params![id, user_id],
                )
            })
            .await
            .map_err(storage_err)?;
        Ok(removed > 0)
    }
}

fn row_to_record(row: &rusqlite::Row) -> Result<MemoryRecord, rusqlite::Error> {
    let tags_json: String = row.get(3)?;
    let timestamp: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    Ok(MemoryRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        text: row.get(2)?,
        tags: serde_json::from_str(&tags_json).map_err(|e| conversion_err(3, e))?,
        emotion: row.get(4)?,
        timestamp: parse_timestamp(&timestamp).map_err(|e| conversion_err(5, e))?,
        created_at: parse_timestamp(&created_at).map_err(|e| conversion_err(6, e))?,
    })
}

/// A stored column that no longer decodes is an error, not a default.
fn conversion_err(
    column: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    async fn store() -> MemoryStore {
        MemoryStore::new(Database::open_in_memory().await.unwrap())
    }

    fn at(user: &str, text: &str, day: u32) -> NewMemory {
        NewMemory {
            timestamp: Some(Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap()),
            ..NewMemory::new(user, text)
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_defaults() {
        let store = store().await;
        let record = store
            .insert(NewMemory::new("u1", "Dentist on Friday"))
            .await
            .unwrap();

        assert!(uuid::Uuid::parse_str(&record.id).is_ok());
        assert_eq!(record.emotion, "neutral");
        assert!(record.tags.is_empty());
        assert_eq!(record.timestamp, record.created_at);

        let fetched = store.get(&record.id).await.unwrap().unwrap();
        assert_eq!(fetched.text, "Dentist on Friday");
        assert_eq!(fetched.user_id, "u1");
    }

    #[tokio::test]
    async fn tags_and_emotion_round_trip() {
        let store = store().await;
        let mut memory = NewMemory::new("u1", "Shipped the release");
        memory.tags = vec!["work".into(), "milestone".into()];
        memory.emotion = "happy".into();
        let record = store.insert(memory).await.unwrap();

        let fetched = store.get(&record.id).await.unwrap().unwrap();
        assert_eq!(fetched.tags, vec!["work", "milestone"]);
        assert_eq!(fetched.emotion, "happy");
    }

    #[tokio::test]
    async fn duplicate_inserts_create_distinct_records() {
        let store = store().await;
        let a = store.insert(NewMemory::new("u1", "same")).await.unwrap();
        let b = store.insert(NewMemory::new("u1", "same")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.all_for_owner("u1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_by_owner_orders_by_event_time_desc() {
        let store = store().await;
        store.insert(at("u1", "second", 2)).await.unwrap();
        store.insert(at("u1", "third", 3)).await.unwrap();
        store.insert(at("u1", "first", 1)).await.unwrap();
        store.insert(at("u2", "other owner", 4)).await.unwrap();

        let listed = store.list_by_owner("u1", 50).await.unwrap();
        let texts: Vec<&str> = listed.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn list_by_owner_respects_limit() {
        let store = store().await;
        for day in 1..=5 {
            store.insert(at("u1", &format!("day {day}"), day)).await.unwrap();
        }
        let listed = store.list_by_owner("u1", 2).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].text, "day 5");
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = store().await;
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_is_scoped_to_owner() {
        let store = store().await;
        let record = store.insert(NewMemory::new("u1", "private")).await.unwrap();

        assert!(!store.delete("u2", &record.id).await.unwrap());
        assert!(store.get(&record.id).await.unwrap().is_some());

        assert!(store.delete("u1", &record.id).await.unwrap());
        assert!(store.get(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("echoos.db");

        let db = Database::open(&path, true).await.unwrap();
        let id = MemoryStore::new(db.clone())
            .insert(NewMemory::new("u1", "persisted"))
            .await
            .unwrap()
            .id;
        db.close().await.unwrap();

        let reopened = MemoryStore::new(Database::open(&path, true).await.unwrap());
        let record = reopened.get(&id).await.unwrap().unwrap();
        assert_eq!(record.text, "persisted");
    }

    #[tokio::test]
    async fn corrupt_columns_surface_as_storage_errors() {
        let db = Database::open_in_memory().await.unwrap();
        let store = MemoryStore::new(db.clone());
        let tags = store.insert(NewMemory::new("u1", "bad tags")).await.unwrap();
        let time = store.insert(NewMemory::new("u1", "bad time")).await.unwrap();

        let (tags_id, time_id) = (tags.id.clone(), time.id.clone());
        db.connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute("UPDATE memories SET tags = 'not json' WHERE id = ?1", [tags_id])?;
                conn.execute(
                    "UPDATE memories SET timestamp = 'yesterday' WHERE id = ?1",
                    [time_id],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        assert!(matches!(store.get(&tags.id).await, Err(EchoError::Storage { .. })));
        assert!(matches!(store.get(&time.id).await, Err(EchoError::Storage { .. })));
        assert!(matches!(
            store.list_by_owner("u1", 10).await,
            Err(EchoError::Storage { .. })
        ));
    }
}
