// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds every service from the loaded configuration.

use std::sync::Arc;

use echoos_agent::{AgentRegistry, Dispatcher};
use echoos_config::model::EchoConfig;
use echoos_core::traits::{PluginAdapter, VectorIndexAdapter};
use echoos_core::types::HealthStatus;
use echoos_core::EchoError;
use echoos_generation::{GenerationEngine, RetryPolicy};
use echoos_memory::{MemoryService, RetrievalOrchestrator, TextVectorizer};
use echoos_mood::MoodClassifier;
use echoos_openai::OpenAiProvider;
use echoos_pinecone::PineconeIndex;
use echoos_storage::{Database, MemoryStore};
use tracing::{info, warn};

pub struct Services {
    pub memory: MemoryService,
    pub retrieval: RetrievalOrchestrator,
    pub engine: GenerationEngine,
    pub mood: MoodClassifier,
    pub dispatcher: Dispatcher,
    pub database: Database,
}

/// Constructs the adapters once and hands them to each component.
pub async fn build_services(config: &EchoConfig) -> Result<Services, EchoError> {
    let openai = Arc::new(OpenAiProvider::new(&config.openai)?);
    let pinecone = PineconeIndex::new(&config.pinecone)?;
    match pinecone.health_check().await? {
        HealthStatus::Healthy => {}
        status => warn!(?status, "vector index not ready, retrieval will degrade"),
    }
    let index: Arc<dyn VectorIndexAdapter> = Arc::new(pinecone);

    let database = Database::open(&config.storage.database_path, config.storage.wal_mode).await?;
    info!(path = %config.storage.database_path, "memory store opened");
    let store = MemoryStore::new(database.clone());

    let vectorizer = TextVectorizer::new(openai.clone());
    let retrieval = RetrievalOrchestrator::new(vectorizer.clone(), Arc::clone(&index));
    let engine = GenerationEngine::new(openai.clone(), RetryPolicy::from_config(&config.retry));
    let registry = AgentRegistry::standard(
        retrieval.clone(),
        engine.clone(),
        config.retrieval.agent_top_k,
    );

    Ok(Services {
        memory: MemoryService::new(store, vectorizer, index),
        retrieval,
        engine,
        mood: MoodClassifier::new(openai),
        dispatcher: Dispatcher::new(Arc::new(registry)),
        database,
    })
}
