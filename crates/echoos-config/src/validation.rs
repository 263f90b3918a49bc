// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Credentials are not checked here. A missing index name or API key is a
//! call-time configuration error raised by the adapter that needs it.

use crate::diagnostic::ConfigError;
use crate::model::EchoConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &EchoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(validation("storage.database_path must not be empty".to_string()));
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(validation("gateway.host must not be empty".to_string()));
    }

    for (key, value) in [
        ("retrieval.chat_top_k", config.retrieval.chat_top_k),
        ("retrieval.agent_top_k", config.retrieval.agent_top_k),
        ("retrieval.search_limit", config.retrieval.search_limit),
        ("retrieval.list_limit", config.retrieval.list_limit),
    ] {
        if value == 0 {
            errors.push(validation(format!("{key} must be at least 1")));
        }
    }

    if config.retry.max_attempts == 0 {
        errors.push(validation("retry.max_attempts must be at least 1".to_string()));
    }

    if config.retry.min_wait_secs > config.retry.max_wait_secs {
        errors.push(validation(format!(
            "retry.min_wait_secs ({}) must not exceed retry.max_wait_secs ({})",
            config.retry.min_wait_secs, config.retry.max_wait_secs
        )));
    }

    let temperature = config.openai.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(validation(format!(
            "openai.temperature must be between 0 and 2, got {temperature}"
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation(message: String) -> ConfigError {
    ConfigError::Validation { message }
}
