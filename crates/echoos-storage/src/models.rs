// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory record types.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Emotion stored on a record when the caller supplies none.
pub const DEFAULT_EMOTION: &str = "neutral";

/// A durable memory record. Its `id` is also the id of its vector entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub tags: Vec<String>,
    pub emotion: String,
    /// When the remembered event happened.
    pub timestamp: DateTime<Utc>,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

/// Input for [`crate::MemoryStore::insert`]; id and creation time are assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMemory {
    pub user_id: String,
    pub text: String,
    pub tags: Vec<String>,
    pub emotion: String,
    /// Event time. `None` means "now".
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewMemory {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
            tags: Vec::new(),
            emotion: DEFAULT_EMOTION.to_string(),
            timestamp: None,
        }
    }
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}
