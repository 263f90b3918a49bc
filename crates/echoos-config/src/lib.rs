// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the EchoOS backend.
//!
//! TOML files from the usual hierarchy are layered under environment
//! overrides, deserialized strictly (`deny_unknown_fields`), validated, and
//! reported as miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use echoos_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Assistant: {}", config.assistant.name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::EchoConfig;

/// Load configuration from the file hierarchy and environment, then validate it.
pub fn load_and_validate() -> Result<EchoConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<EchoConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Contents of every config file that exists, keyed by the path figment reports.
fn collect_toml_sources() -> Vec<(String, String)> {
    loader::config_file_paths()
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            let display = if path.is_relative() {
                std::env::current_dir()
                    .map(|d| d.join(&path))
                    .unwrap_or(path)
            } else {
                path
            };
            Some((display.display().to_string(), content))
        })
        .collect()
}
