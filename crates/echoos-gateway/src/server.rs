// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{delete, get, post};
use axum::Router;
use echoos_agent::Dispatcher;
use echoos_config::model::{EchoConfig, GatewayConfig};
use echoos_core::EchoError;
use echoos_generation::GenerationEngine;
use echoos_memory::{MemoryService, RetrievalOrchestrator};
use echoos_mood::MoodClassifier;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;

/// Request-independent values the handlers read.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub system_prompt: String,
    pub chat_top_k: usize,
    pub search_limit: usize,
    pub list_limit: usize,
}

impl GatewaySettings {
    pub fn from_config(config: &EchoConfig) -> Self {
        Self {
            system_prompt: config.assistant.resolved_system_prompt(),
            chat_top_k: config.retrieval.chat_top_k,
            search_limit: config.retrieval.search_limit,
            list_limit: config.retrieval.list_limit,
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub memory: MemoryService,
    pub retrieval: RetrievalOrchestrator,
    pub engine: GenerationEngine,
    pub mood: MoodClassifier,
    pub dispatcher: Dispatcher,
    pub settings: Arc<GatewaySettings>,
    pub started: Instant,
}

impl AppState {
    pub fn new(
        memory: MemoryService,
        retrieval: RetrievalOrchestrator,
        engine: GenerationEngine,
        mood: MoodClassifier,
        dispatcher: Dispatcher,
        settings: GatewaySettings,
    ) -> Self {
        Self {
            memory,
            retrieval,
            engine,
            mood,
            dispatcher,
            settings: Arc::new(settings),
            started: Instant::now(),
        }
    }
}

/// All routes with tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/memory/save", post(handlers::save_memory))
        .route("/memory/search", get(handlers::search_memory))
        .route("/memory/all", get(handlers::list_memories))
        .route("/memory/reindex", post(handlers::reindex_memories))
        .route("/memory/{id}", delete(handlers::forget_memory))
        .route("/agents", get(handlers::list_agents))
        .route("/agents/run", post(handlers::run_agent))
        .route("/mood", post(handlers::detect_mood));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds to `host:port` and serves until ctrl-c.
pub async fn start_server(config: &GatewayConfig, state: AppState) -> Result<(), EchoError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| EchoError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    info!("Gateway server listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| EchoError::Internal(format!("gateway server error: {e}")))?;

    info!("Gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
