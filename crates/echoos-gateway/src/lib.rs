// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for EchoOS.
//!
//! Exposes chat (as a server-sent event stream), memory, agent, and mood
//! endpoints over axum.

pub mod error;
pub mod handlers;
pub mod server;
pub mod sse;

pub use error::{ApiError, ErrorResponse};
pub use server::{router, start_server, AppState, GatewaySettings};
pub use sse::{ChatEvent, ChatEventStream};
