// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI chat completions and embeddings APIs.
//!
//! The client performs exactly one HTTP request per call. Retry policy
//! belongs to the caller.

use std::pin::Pin;
use std::time::Duration;

use echoos_core::EchoError;
use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::sse;
use crate::types::{
    ApiErrorResponse, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse,
    EmbeddingRequest, EmbeddingResponse,
};

/// A boxed stream of parsed completion chunks.
pub type ChunkStream =
    Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, EchoError>> + Send>>;

/// HTTP client for OpenAI-compatible APIs.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OpenAiClient {
    /// Creates a client authenticating with `api_key` against `base_url`
    /// (for example `https://api.openai.com/v1`).
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, EchoError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                EchoError::Config(format!("invalid OpenAI API key header value: {e}"))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| EchoError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Sends a non-streaming chat completion request.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, EchoError> {
        let mut req = request.clone();
        req.stream = false;

        let response = self.post("chat/completions", &req).await?;
        let body = response.text().await.map_err(|e| EchoError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body).map_err(|e| EchoError::Provider {
            message: format!("failed to parse chat completion: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Sends a streaming chat completion request.
    ///
    /// Errors in the initial response surface here; errors after the stream
    /// has started arrive as stream items.
    pub async fn stream_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChunkStream, EchoError> {
        let mut req = request.clone();
        req.stream = true;

        let response = self.post("chat/completions", &req).await?;
        Ok(sse::parse_sse_stream(response))
    }

    /// Requests embeddings for a batch of inputs.
    pub async fn embeddings(
        &self,
        request: &EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EchoError> {
        let response = self.post("embeddings", request).await?;
        response
            .json::<EmbeddingResponse>()
            .await
            .map_err(|e| EchoError::Provider {
                message: format!("failed to parse embeddings response: {e}"),
                source: Some(Box::new(e)),
            })
    }

    /// POSTs a JSON body and returns the response if its status is 2xx.
    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<reqwest::Response, EchoError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_err(e))?;

        let status = response.status();
        debug!(status = %status, endpoint, "OpenAI response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => format!(
                "OpenAI API error ({}, {}): {}",
                status,
                api_err.error.type_.as_deref().unwrap_or("unknown"),
                api_err.error.message
            ),
            Err(_) => format!("API returned {status}: {body}"),
        };
        Err(EchoError::Provider {
            message,
            source: None,
        })
    }

    fn transport_err(&self, e: reqwest::Error) -> EchoError {
        if e.is_timeout() {
            EchoError::Timeout {
                duration: self.timeout,
            }
        } else {
            EchoError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}
