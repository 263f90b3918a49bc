// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent dispatch and tolerant parsing of agent output.

use std::sync::Arc;

use echoos_core::EchoError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::agent::AgentDescriptor;
use crate::registry::AgentRegistry;

/// Model output that either decoded into `T` or did not.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Structured(T),
    Raw(String),
}

impl<T: DeserializeOwned> Parsed<T> {
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str(text.trim()) {
            Ok(value) => Parsed::Structured(value),
            Err(_) => Parsed::Raw(text.to_string()),
        }
    }
}

/// The structured result every agent run resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOutput {
    pub summary: String,
    #[serde(default)]
    pub suggested_tasks: Vec<String>,
}

impl From<Parsed<AgentOutput>> for AgentOutput {
    fn from(parsed: Parsed<AgentOutput>) -> Self {
        match parsed {
            Parsed::Structured(output) => output,
            Parsed::Raw(summary) => AgentOutput {
                summary,
                suggested_tasks: Vec::new(),
            },
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<AgentRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self { registry }
    }

    pub fn agents(&self) -> Vec<AgentDescriptor> {
        self.registry.descriptors()
    }

    /// Runs agent `id`. An unknown id fails before any I/O. Agent failures
    /// surface as [`EchoError::Internal`]; unparseable output never fails.
    pub async fn dispatch(
        &self,
        id: &str,
        input: &str,
        context: Option<&Value>,
    ) -> Result<AgentOutput, EchoError> {
        let agent = self.registry.resolve(id)?;

        let text = agent.run(input, context).await.map_err(|e| {
            error!(agent = id, error = %e, "agent run failed");
            EchoError::Internal(format!("agent {id} failed: {e}"))
        })?;

        let parsed = Parsed::<AgentOutput>::parse(&text);
        if let Parsed::Raw(_) = parsed {
            debug!(agent = id, "agent output was not structured, wrapping raw text");
        }
        Ok(parsed.into())
    }
}
