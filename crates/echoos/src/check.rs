// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `echoos check-config`.

use echoos_config::model::EchoConfig;
use echoos_core::EchoError;

const REDACTED: &str = "<redacted>";

/// The configuration with every credential replaced by a placeholder.
pub fn redacted(config: &EchoConfig) -> EchoConfig {
    let mut shown = config.clone();
    if shown.openai.api_key.is_some() {
        shown.openai.api_key = Some(REDACTED.into());
    }
    if shown.pinecone.api_key.is_some() {
        shown.pinecone.api_key = Some(REDACTED.into());
    }
    shown
}

/// Prints the effective configuration. Loading and validation already happened.
pub fn run_check(config: &EchoConfig) -> Result<(), EchoError> {
    let rendered = toml::to_string_pretty(&redacted(config))
        .map_err(|e| EchoError::Internal(format!("failed to render configuration: {e}")))?;
    println!("# configuration is valid\n{rendered}");
    Ok(())
}
