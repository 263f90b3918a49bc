// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the EchoOS backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level EchoOS configuration.
///
/// Constructed once at startup and handed by reference to every component.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EchoConfig {
    /// Assistant identity and logging.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Embedding and generation provider settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Vector index settings.
    #[serde(default)]
    pub pinecone: PineconeConfig,

    /// Durable memory store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Retrieval depth and listing limits.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Backoff policy for non-streaming completions.
    #[serde(default)]
    pub retry: RetryConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Assistant identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Display name used in the default system prompt.
    #[serde(default = "default_assistant_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Replaces the default system prompt when set.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            log_level: default_log_level(),
            system_prompt: None,
        }
    }
}

impl AssistantConfig {
    /// The system prompt for chat turns, before any retrieved context is appended.
    pub fn resolved_system_prompt(&self) -> String {
        match &self.system_prompt {
            Some(prompt) => prompt.clone(),
            None => format!(
                "You are {}, an intelligent AI assistant in the EchoOS workspace. \
                 Be helpful, concise, and professional.",
                self.name
            ),
        }
    }
}

fn default_assistant_name() -> String {
    "Echo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// OpenAI-compatible provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. Usually supplied through `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the REST API.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model used for chat completions, agents, and mood fallback.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used for embeddings.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature for chat completions.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Pinecone vector index configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PineconeConfig {
    /// API key. Usually supplied through `PINECONE_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Logical index name. Usually supplied through `PINECONE_INDEX`.
    #[serde(default)]
    pub index_name: Option<String>,

    /// Region/environment hint. Logged, not needed to reach the index.
    #[serde(default)]
    pub environment: Option<String>,

    /// Data-plane host. When unset it is looked up from the control plane.
    #[serde(default)]
    pub index_host: Option<String>,

    /// Control-plane URL used to resolve `index_host`.
    #[serde(default = "default_control_plane_url")]
    pub control_plane_url: String,

    /// Value of the `X-Pinecone-API-Version` header.
    #[serde(default = "default_pinecone_api_version")]
    pub api_version: String,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            index_name: None,
            environment: None,
            index_host: None,
            control_plane_url: default_control_plane_url(),
            api_version: default_pinecone_api_version(),
        }
    }
}

fn default_control_plane_url() -> String {
    "https://api.pinecone.io".to_string()
}

fn default_pinecone_api_version() -> String {
    "2025-01".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("echoos").join("echoos.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("echoos.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Retrieval depth and result limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Matches retrieved to augment a chat turn.
    #[serde(default = "default_chat_top_k")]
    pub chat_top_k: usize,

    /// Matches retrieved by the research agent.
    #[serde(default = "default_agent_top_k")]
    pub agent_top_k: usize,

    /// Default result count for memory search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Default record count for memory listing.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chat_top_k: default_chat_top_k(),
            agent_top_k: default_agent_top_k(),
            search_limit: default_search_limit(),
            list_limit: default_list_limit(),
        }
    }
}

fn default_chat_top_k() -> usize {
    3
}

fn default_agent_top_k() -> usize {
    5
}

fn default_search_limit() -> usize {
    5
}

fn default_list_limit() -> usize {
    50
}

/// Exponential backoff for non-streaming completions.
///
/// The wait before attempt `n + 1` is `multiplier * 2^(n - 1)` seconds,
/// clamped to `[min_wait_secs, max_wait_secs]`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_multiplier_secs")]
    pub multiplier_secs: u64,

    #[serde(default = "default_min_wait_secs")]
    pub min_wait_secs: u64,

    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            multiplier_secs: default_multiplier_secs(),
            min_wait_secs: default_min_wait_secs(),
            max_wait_secs: default_max_wait_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_multiplier_secs() -> u64 {
    1
}

fn default_min_wait_secs() -> u64 {
    4
}

fn default_max_wait_secs() -> u64 {
    10
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8000
}
