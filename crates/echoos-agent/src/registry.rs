// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup-built lookup table from agent id to implementation.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use echoos_core::EchoError;
use echoos_generation::GenerationEngine;
use echoos_memory::RetrievalOrchestrator;
use strum::IntoEnumIterator;
use tracing::info;

use crate::agent::{Agent, AgentDescriptor, AgentKind, AgentStatus};
use crate::research::ResearchAgent;

#[derive(Default)]
pub struct AgentRegistry {
    agents: HashMap<AgentKind, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with every active agent kind wired up.
    pub fn standard(
        retrieval: RetrievalOrchestrator,
        engine: GenerationEngine,
        research_top_k: usize,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(
            AgentKind::Research,
            Arc::new(ResearchAgent::new(retrieval, engine, research_top_k)),
        );
        registry
    }

    pub fn register(&mut self, kind: AgentKind, agent: Arc<dyn Agent>) {
        info!(agent = %kind, "agent registered");
        self.agents.insert(kind, agent);
    }

    /// Catalogue of every kind, registered or not, in declaration order.
    pub fn descriptors(&self) -> Vec<AgentDescriptor> {
        AgentKind::iter().map(AgentKind::descriptor).collect()
    }

    /// Resolves a runnable agent. Unknown, inactive, and unregistered ids are all not found.
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn Agent>, EchoError> {
        AgentKind::from_str(id)
            .ok()
            .filter(|kind| kind.descriptor().status == AgentStatus::Active)
            .and_then(|kind| self.agents.get(&kind).cloned())
            .ok_or_else(|| EchoError::NotFound(format!("Unknown agent: {id}")))
    }
}
