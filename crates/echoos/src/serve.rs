// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `echoos serve` and `echoos reindex`.

use echoos_config::model::EchoConfig;
use echoos_core::EchoError;
use echoos_gateway::{AppState, GatewaySettings};
use tracing::info;

use crate::wiring::build_services;

/// Starts the HTTP gateway and blocks until shutdown.
pub async fn run_serve(config: EchoConfig) -> Result<(), EchoError> {
    init_tracing(&config.assistant.log_level);
    echoos_memory::recording::register_metrics();
    echoos_generation::register_metrics();

    let services = build_services(&config).await?;
    let state = AppState::new(
        services.memory,
        services.retrieval,
        services.engine,
        services.mood,
        services.dispatcher,
        GatewaySettings::from_config(&config),
    );

    info!(
        assistant = %config.assistant.name,
        chat_model = %config.openai.chat_model,
        "echoos starting"
    );
    echoos_gateway::start_server(&config.gateway, state).await?;

    services.database.close().await
}

/// Re-embeds one owner's memories and exits.
pub async fn run_reindex(config: EchoConfig, owner: &str) -> Result<(), EchoError> {
    init_tracing(&config.assistant.log_level);

    let services = build_services(&config).await?;
    let count = services.memory.reindex(owner).await?;
    println!("reindexed {count} memories for {owner}");

    services.database.close().await
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("echoos={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
