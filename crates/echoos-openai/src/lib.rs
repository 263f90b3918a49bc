// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI adapters for EchoOS.
//!
//! [`OpenAiProvider`] implements both [`ProviderAdapter`] (chat completions,
//! streamed over SSE) and [`EmbeddingAdapter`] (batch embeddings).

pub mod client;
pub mod sse;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use echoos_config::model::OpenAiConfig;
use echoos_core::traits::{EmbeddingAdapter, PluginAdapter, ProviderAdapter, ProviderStream};
use echoos_core::types::{
    AdapterType, ChatMessage, EmbeddingInput, EmbeddingOutput, HealthStatus, ProviderRequest,
    ProviderResponse, ProviderStreamChunk, Role,
};
use echoos_core::EchoError;
use futures::stream::StreamExt;
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ApiMessage, ChatCompletionRequest, EmbeddingRequest, ResponseFormat};

/// OpenAI chat and embedding provider.
pub struct OpenAiProvider {
    client: OpenAiClient,
    chat_model: String,
    embedding_model: String,
    temperature: f32,
}

impl OpenAiProvider {
    /// Creates the provider from configuration.
    ///
    /// Fails with [`EchoError::Config`] when no API key is configured.
    pub fn new(config: &OpenAiConfig) -> Result<Self, EchoError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                EchoError::Config(
                    "OpenAI API key is not set (openai.api_key or OPENAI_API_KEY)".into(),
                )
            })?;

        let client = OpenAiClient::new(
            api_key,
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;

        info!(
            chat_model = %config.chat_model,
            embedding_model = %config.embedding_model,
            "OpenAI provider initialized"
        );

        Ok(Self {
            client,
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
        })
    }

    fn to_completion_request(&self, request: &ProviderRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.chat_model.clone()),
            messages: request.messages.iter().map(to_api_message).collect(),
            temperature: Some(request.temperature.unwrap_or(self.temperature)),
            stream: false,
            response_format: request.json_response.then(ResponseFormat::json_object),
        }
    }
}

fn to_api_message(message: &ChatMessage) -> ApiMessage {
    let role = match message.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    ApiMessage {
        role: role.to_string(),
        content: message.content.clone(),
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, EchoError> {
        // Avoid spending tokens on health checks.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EchoError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, EchoError> {
        let api_request = self.to_completion_request(&request);
        let response = self.client.chat_completion(&api_request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(ProviderResponse {
            content,
            model: if response.model.is_empty() {
                api_request.model
            } else {
                response.model
            },
        })
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ProviderStream, EchoError> {
        let api_request = self.to_completion_request(&request);
        let chunks = self.client.stream_chat_completion(&api_request).await?;

        let mapped = chunks.map(|result| {
            result.map(|chunk| ProviderStreamChunk {
                text: chunk
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.delta.content)
                    .unwrap_or_default(),
            })
        });
        Ok(Box::pin(mapped))
    }
}

#[async_trait]
impl EmbeddingAdapter for OpenAiProvider {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, EchoError> {
        if input.texts.is_empty() {
            return Ok(EmbeddingOutput::default());
        }

        let expected = input.texts.len();
        let response = self
            .client
            .embeddings(&EmbeddingRequest {
                model: self.embedding_model.clone(),
                input: input.texts,
            })
            .await?;

        let mut data = response.data;
        if data.len() != expected {
            return Err(EchoError::Provider {
                message: format!(
                    "embedding provider returned {} vectors for {expected} inputs",
                    data.len()
                ),
                source: None,
            });
        }
        data.sort_by_key(|d| d.index);

        Ok(EmbeddingOutput {
            embeddings: data.into_iter().map(|d| d.embedding).collect(),
        })
    }
}
