// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory pipeline for EchoOS.
//!
//! Provides text vectorization, context retrieval for chat and agents, and
//! the memory service that keeps the durable store and the vector index in
//! step.

pub mod recording;
pub mod retrieval;
pub mod service;
pub mod vectorizer;

pub use retrieval::{join_context, RetrievalOrchestrator};
pub use service::{IndexOutcome, MemoryInput, MemoryService, SaveOperation, SaveReceipt};
pub use vectorizer::TextVectorizer;
