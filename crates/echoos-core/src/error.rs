// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the EchoOS retrieval and generation pipeline.

use thiserror::Error;

/// The primary error type used across all EchoOS adapter traits and services.
#[derive(Debug, Error)]
pub enum EchoError {
    /// A required credential, index name, or setting is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller-supplied input is malformed (mismatched batch sizes, bad timestamps).
    #[error("validation error: {0}")]
    Validation(String),

    /// An external provider call failed (transport, auth, unexpected status).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The requested agent or resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Model output did not have the expected structure.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Durable store errors (connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EchoError {
    /// Whether a bounded retry policy may try the failed call again.
    ///
    /// Only provider and timeout failures qualify. Configuration and
    /// validation problems will not fix themselves between attempts.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EchoError::Provider { .. } | EchoError::Timeout { .. })
    }
}
