// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use echoos_agent::{AgentDescriptor, AgentOutput};
use echoos_core::types::VectorMatch;
use echoos_generation::ChatTurn;
use echoos_memory::{MemoryInput, SaveReceipt};
use echoos_mood::{quick_read, MoodResult};
use echoos_storage::MemoryRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::server::AppState;
use crate::sse::ChatEventStream;

/// Header carrying the caller's owner reference.
pub const USER_ID_HEADER: &str = "x-user-id";

const ANONYMOUS: &str = "anonymous";

/// Header first, then the request's own `user_id`, then anonymous.
pub fn resolve_owner(headers: &HeaderMap, requested: Option<&str>) -> String {
    fn usable(raw: Option<&str>) -> Option<&str> {
        raw.map(str::trim).filter(|s| !s.is_empty())
    }

    let header = headers.get(USER_ID_HEADER).and_then(|v| v.to_str().ok());
    usable(header)
        .or_else(|| usable(requested))
        .unwrap_or(ANONYMOUS)
        .to_string()
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub input: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveMemoryRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub memory: MemoryInput,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MemoryList {
    pub memories: Vec<MemoryRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OwnerParams {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReindexResponse {
    pub reindexed: usize,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct AgentRunRequest {
    pub agent_id: String,
    pub input: String,
    #[serde(default)]
    pub context: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct AgentRunResponse {
    pub result: AgentOutput,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    pub text: String,
}

/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to EchoOS API",
    })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}

/// POST /api/chat
///
/// Returns the event stream immediately. Retrieval runs inside the stream,
/// after the metadata event.
pub async fn chat(State(state): State<AppState>, Json(body): Json<ChatRequest>) -> impl IntoResponse {
    let mood = quick_read(&body.input);
    debug!(mood = mood.mood, "chat turn started");

    let retrieval = state.retrieval.clone();
    let engine = state.engine.clone();
    let system_prompt = state.settings.system_prompt.clone();
    let top_k = state.settings.chat_top_k;
    let input = body.input;

    let events = ChatEventStream::new(mood, async move {
        let context = retrieval.build_context(&input, top_k).await;
        let turn = ChatTurn::new(system_prompt, input, context);
        engine.stream_complete(turn.messages())
    });

    Sse::new(events.into_sse()).keep_alive(KeepAlive::default())
}

/// POST /api/memory/save
pub async fn save_memory(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SaveMemoryRequest>,
) -> Result<Json<SaveReceipt>, ApiError> {
    let owner = resolve_owner(&headers, body.user_id.as_deref());
    let receipt = state.memory.save(&owner, body.memory).await?;
    Ok(Json(receipt))
}

/// GET /api/memory/search?q=&limit=
pub async fn search_memory(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<VectorMatch>>, ApiError> {
    let limit = params.limit.unwrap_or(state.settings.search_limit);
    let matches = state.memory.search(&params.q, limit).await?;
    Ok(Json(matches))
}

/// GET /api/memory/all?limit=
pub async fn list_memories(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<MemoryList>, ApiError> {
    let owner = resolve_owner(&headers, params.user_id.as_deref());
    let limit = params.limit.unwrap_or(state.settings.list_limit);
    let memories = state.memory.list(&owner, limit).await?;
    Ok(Json(MemoryList { memories }))
}

/// DELETE /api/memory/{id}?user_id=
pub async fn forget_memory(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<OwnerParams>,
) -> Result<StatusCode, ApiError> {
    let owner = resolve_owner(&headers, params.user_id.as_deref());
    state.memory.forget(&owner, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/memory/reindex?user_id=
pub async fn reindex_memories(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<OwnerParams>,
) -> Result<Json<ReindexResponse>, ApiError> {
    let owner = resolve_owner(&headers, params.user_id.as_deref());
    let reindexed = state.memory.reindex(&owner).await?;
    Ok(Json(ReindexResponse {
        reindexed,
        status: "success",
    }))
}

/// GET /api/agents
pub async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentDescriptor>> {
    Json(state.dispatcher.agents())
}

/// POST /api/agents/run
pub async fn run_agent(
    State(state): State<AppState>,
    Json(body): Json<AgentRunRequest>,
) -> Result<Json<AgentRunResponse>, ApiError> {
    let result = state
        .dispatcher
        .dispatch(&body.agent_id, &body.input, body.context.as_ref())
        .await?;
    Ok(Json(AgentRunResponse {
        result,
        status: "success",
    }))
}

/// POST /api/mood
pub async fn detect_mood(
    State(state): State<AppState>,
    Json(body): Json<MoodRequest>,
) -> Json<MoodResult> {
    Json(state.mood.detect(&body.text).await)
}
