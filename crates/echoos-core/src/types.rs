// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the adapter traits and pipeline services.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of external collaborator an adapter wraps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Embedding,
    VectorIndex,
    Storage,
}

// --- Generation types ---

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role/content pair sent to a generation provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A request to a generation provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderRequest {
    /// Model override. `None` uses the provider's configured chat model.
    pub model: Option<String>,
    /// Ordered conversation, system prompt first.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature override.
    pub temperature: Option<f32>,
    /// Ask the provider to constrain its output to a JSON object.
    pub json_response: bool,
}

impl ProviderRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Constrains the reply to a single JSON object.
    pub fn with_json_response(mut self) -> Self {
        self.json_response = true;
        self
    }
}

/// A complete (non-streaming) provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub content: String,
    pub model: String,
}

/// One incremental fragment of a streamed provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderStreamChunk {
    pub text: String,
}

// --- Embedding types ---

/// A batch of texts to embed.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

/// Embeddings in input order, one per text.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
}

// --- Vector index types ---

/// String-keyed metadata stored alongside a vector entry.
pub type VectorMetadata = serde_json::Map<String, serde_json::Value>;

/// A single similarity match returned by a vector index query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: VectorMetadata,
}

impl VectorMatch {
    /// The `text` metadata field, if present and a non-empty string.
    pub fn text(&self) -> Option<&str> {
        self.metadata
            .get("text")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Ranked matches in descending similarity order, as returned by the index.
pub type RetrievalResult = Vec<VectorMatch>;
