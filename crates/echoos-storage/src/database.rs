// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection management: PRAGMA setup, WAL mode, and migrations on open.
//!
//! All statements run on tokio-rusqlite's single background thread, so
//! every write is serialized without an in-process lock.

use std::path::Path;

use echoos_core::EchoError;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::migrations;

/// Converts tokio-rusqlite errors into [`EchoError::Storage`].
pub(crate) fn storage_err(e: tokio_rusqlite::Error) -> EchoError {
    EchoError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and applies migrations.
    pub async fn open(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self, EchoError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| EchoError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(&path).await.map_err(|e| storage_err(e.into()))?;
        let db = Self { conn };
        db.prepare(wal_mode).await?;
        info!(path = %path.display(), wal_mode, "memory database opened");
        Ok(db)
    }

    /// Opens a private in-memory database with the schema applied.
    pub async fn open_in_memory() -> Result<Self, EchoError> {
        let conn = Connection::open_in_memory().await.map_err(|e| storage_err(e.into()))?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    /// The shared background connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    async fn prepare(&self, wal_mode: bool) -> Result<(), EchoError> {
        let migrated = self
            .conn
            .call(move |conn| -> Result<Result<(), EchoError>, rusqlite::Error> {
                if wal_mode {
                    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
                }
                conn.execute_batch(
                    "PRAGMA foreign_keys = ON;
                     PRAGMA busy_timeout = 5000;
                     PRAGMA synchronous = NORMAL;",
                )?;
                Ok(migrations::run_migrations(conn))
            })
            .await
            .map_err(storage_err)?;
        migrated?;
        debug!("schema migrations applied");
        Ok(())
    }

    /// Checkpoints the WAL and closes the connection.
    pub async fn close(self) -> Result<(), EchoError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;
        self.conn.close().await.map_err(storage_err)
    }
}
