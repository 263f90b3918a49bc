// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./echoos.toml` > `~/.config/echoos/echoos.toml` >
//! `/etc/echoos/echoos.toml`, then environment overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::EchoConfig;

/// Config sections addressable through `ECHOOS_<SECTION>_<KEY>`.
const SECTIONS: &[&str] = &[
    "assistant",
    "openai",
    "pinecone",
    "storage",
    "retrieval",
    "retry",
    "gateway",
];

/// Conventional provider variables and the keys they populate.
const PROVIDER_VARS: &[(&str, &str)] = &[
    ("openai_api_key", "openai.api_key"),
    ("pinecone_key", "pinecone.api_key"),
    ("pinecone_index", "pinecone.index_name"),
    ("pinecone_env", "pinecone.environment"),
];

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/echoos/echoos.toml`
/// 3. `~/.config/echoos/echoos.toml`
/// 4. `./echoos.toml`
/// 5. `OPENAI_API_KEY`, `PINECONE_KEY`, `PINECONE_INDEX`, `PINECONE_ENV`
/// 6. `ECHOOS_*` environment variables
pub fn load_config() -> Result<EchoConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string over the compiled defaults only.
pub fn load_config_from_str(toml_content: &str) -> Result<EchoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EchoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EchoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EchoConfig::default()))
        .merge(Toml::file(path))
        .merge(provider_env())
        .merge(env_provider())
        .extract()
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(EchoConfig::default()));
    for path in config_file_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(provider_env()).merge(env_provider())
}

/// Candidate config files, lowest precedence first.
pub(crate) fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/echoos/echoos.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("echoos/echoos.toml"));
    }
    paths.push(PathBuf::from("echoos.toml"));
    paths
}

/// `ECHOOS_<SECTION>_<KEY>` variables mapped to `section.key`.
///
/// Only the first underscore after the section name becomes a dot, so
/// `ECHOOS_RETRIEVAL_CHAT_TOP_K` lands on `retrieval.chat_top_k`.
fn env_provider() -> Env {
    Env::prefixed("ECHOOS_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        for section in SECTIONS {
            if let Some(rest) = key_str
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.into()
    })
}

/// The unprefixed credential variables most deployments already export.
fn provider_env() -> Env {
    let names: Vec<&str> = PROVIDER_VARS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        PROVIDER_VARS
            .iter()
            .find(|(name, _)| *name == key_str)
            .map(|(_, target)| (*target).to_string())
            .unwrap_or(key_str)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoos_prefixed_vars_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ECHOOS_RETRIEVAL_CHAT_TOP_K", "7");
            jail.set_env("ECHOOS_OPENAI_CHAT_MODEL", "gpt-4o");
            jail.set_env("ECHOOS_GATEWAY_PORT", "9100");

            let config = load_config()?;
            assert_eq!(config.retrieval.chat_top_k, 7);
            assert_eq!(config.openai.chat_model, "gpt-4o");
            assert_eq!(config.gateway.port, 9100);
            Ok(())
        });
    }

    #[test]
    fn conventional_provider_vars_are_honoured() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("OPENAI_API_KEY", "sk-test");
            jail.set_env("PINECONE_KEY", "pc-test");
            jail.set_env("PINECONE_INDEX", "echo-memories");
            jail.set_env("PINECONE_ENV", "us-east-1");

            let config = load_config()?;
            assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
            assert_eq!(config.pinecone.api_key.as_deref(), Some("pc-test"));
            assert_eq!(config.pinecone.index_name.as_deref(), Some("echo-memories"));
            assert_eq!(config.pinecone.environment.as_deref(), Some("us-east-1"));
            Ok(())
        });
    }

    #[test]
    fn prefixed_var_beats_conventional_var() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PINECONE_INDEX", "from-conventional");
            jail.set_env("ECHOOS_PINECONE_INDEX_NAME", "from-prefixed");

            let config = load_config()?;
            assert_eq!(config.pinecone.index_name.as_deref(), Some("from-prefixed"));
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "echoos.toml",
                r#"
                [assistant]
                name = "Nova"
                "#,
            )?;

            let config = load_config()?;
            assert_eq!(config.assistant.name, "Nova");
            assert_eq!(config.openai.chat_model, "gpt-4o-mini");
            Ok(())
        });
    }
}
