// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agents for EchoOS.
//!
//! Agent kinds form a closed enum. The [`AgentRegistry`] maps each runnable
//! kind to its implementation at startup, and the [`Dispatcher`] turns
//! whatever text an agent returns into an [`AgentOutput`].

pub mod agent;
pub mod dispatcher;
pub mod registry;
pub mod research;

pub use agent::{Agent, AgentDescriptor, AgentKind, AgentStatus};
pub use dispatcher::{AgentOutput, Dispatcher, Parsed};
pub use registry::AgentRegistry;
pub use research::ResearchAgent;
