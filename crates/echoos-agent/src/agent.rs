// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The agent capability and the closed set of agent kinds.

use async_trait::async_trait;
use echoos_core::EchoError;
use serde::Serialize;
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A named task runner. Output is text that is expected, not guaranteed,
/// to be a JSON object.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn run(&self, input: &str, context: Option<&Value>) -> Result<String, EchoError>;
}

/// Every agent id the system knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AgentKind {
    Research,
    Coding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    ComingSoon,
}

/// Catalogue entry for one agent kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub status: AgentStatus,
}

impl AgentKind {
    pub fn descriptor(self) -> AgentDescriptor {
        match self {
            AgentKind::Research => AgentDescriptor {
                id: "research",
                name: "Research Agent",
                description: "Searches your memories and summarizes what it finds.",
                status: AgentStatus::Active,
            },
            AgentKind::Coding => AgentDescriptor {
                id: "coding",
                name: "Coding Assistant",
                description: "Helps with code generation and debugging.",
                status: AgentStatus::ComingSoon,
            },
        }
    }
}
