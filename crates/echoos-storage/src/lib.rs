// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for memory records.
//!
//! A single tokio-rusqlite background connection serializes all access.
//! The schema is managed by refinery migrations embedded at compile time.

pub mod database;
pub mod migrations;
pub mod models;
pub mod store;

pub use database::Database;
pub use models::{MemoryRecord, NewMemory, DEFAULT_EMOTION};
pub use store::MemoryStore;
