// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text generation for EchoOS.
//!
//! Streaming never raises: a broken stream ends with an error-marker
//! fragment. Only non-streaming completion retries.

pub mod engine;
pub mod retry;
pub mod turn;

pub use engine::{error_marker, register_metrics, FragmentStream, GenerationEngine};
pub use retry::RetryPolicy;
pub use turn::ChatTurn;
