// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use echoos_core::types::ChatMessage;
use echoos_core::EchoError;
use echoos_generation::GenerationEngine;
use echoos_memory::{join_context, RetrievalOrchestrator};
use serde_json::Value;
use tracing::debug;

use crate::agent::Agent;

const RESEARCH_PROMPT: &str = "You are a helpful research assistant. \
Analyze the provided context and the user's question. \
Return your response in JSON format with the following keys:\n\
- summary: A detailed summary of the findings.\n\
- suggested_tasks: A list of actionable tasks based on the findings (list of strings).";

/// Answers a question from retrieved memories.
pub struct ResearchAgent {
    retrieval: RetrievalOrchestrator,
    engine: GenerationEngine,
    top_k: usize,
}

impl ResearchAgent {
    pub fn new(retrieval: RetrievalOrchestrator, engine: GenerationEngine, top_k: usize) -> Self {
        Self {
            retrieval,
            engine,
            top_k,
        }
    }

    fn user_prompt(retrieved: &str, input: &str, caller_context: Option<&Value>) -> String {
        let mut prompt = format!("Context:\n{retrieved}\n\nQuestion: {input}");
        if let Some(extra) = caller_context.filter(|v| !v.is_null()) {
            prompt.push_str(&format!("\n\nAdditional context:\n{extra}"));
        }
        prompt
    }
}

#[async_trait]
impl Agent for ResearchAgent {
    async fn run(&self, input: &str, context: Option<&Value>) -> Result<String, EchoError> {
        let matches = self.retrieval.retrieve(input, self.top_k).await?;
        let retrieved = join_context(&matches);
        debug!(
            matches = matches.len(),
            context_len = retrieved.len(),
            "research context retrieved"
        );

        let messages = vec![
            ChatMessage::system(RESEARCH_PROMPT),
            ChatMessage::user(Self::user_prompt(&retrieved, input, context)),
        ];
        self.engine.complete_json(messages).await
    }
}
