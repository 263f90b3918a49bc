// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion over a [`ProviderAdapter`], streamed or retried.

use std::pin::Pin;
use std::sync::Arc;

use echoos_core::traits::{ProviderAdapter, ProviderStream};
use echoos_core::types::{ChatMessage, ProviderRequest};
use echoos_core::EchoError;
use futures::stream::{self, Stream, StreamExt};
use metrics::{counter, describe_counter};
use tracing::{debug, warn};

use crate::retry::RetryPolicy;

/// Non-empty text fragments in arrival order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = String> + Send>>;

const RETRIES_METRIC: &str = "echoos_provider_retries_total";

/// Registers metric descriptions with the installed recorder, if any.
pub fn register_metrics() {
    describe_counter!(RETRIES_METRIC, "Completion attempts retried after a retryable error");
}

/// Text shown in place of the remaining answer when a stream breaks.
pub fn error_marker(error: &EchoError) -> String {
    format!("Error: {error}")
}

enum Phase {
    Pending(ProviderRequest),
    Streaming(ProviderStream),
    Done,
}

/// Streaming and non-streaming completion with the house failure policy.
#[derive(Clone)]
pub struct GenerationEngine {
    provider: Arc<dyn ProviderAdapter>,
    retry: RetryPolicy,
}

impl GenerationEngine {
    pub fn new(provider: Arc<dyn ProviderAdapter>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    pub fn provider(&self) -> &Arc<dyn ProviderAdapter> {
        &self.provider
    }

    /// A lazy fragment stream. Nothing is requested until the first poll.
    ///
    /// A provider error, at start or mid-stream, becomes one final
    /// [`error_marker`] fragment. Dropping the stream drops the provider
    /// stream with it.
    pub fn stream_complete(&self, messages: Vec<ChatMessage>) -> FragmentStream {
        let provider = Arc::clone(&self.provider);
        let start = Phase::Pending(ProviderRequest::new(messages));
        Box::pin(stream::unfold(start, move |phase| {
            let provider = Arc::clone(&provider);
            async move { advance(provider.as_ref(), phase).await }
        }))
    }

    /// Single completion, retried on retryable errors per the [`RetryPolicy`].
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, EchoError> {
        self.complete_request(ProviderRequest::new(messages)).await
    }

    /// Like [`Self::complete`] but asks the provider for a JSON object.
    pub async fn complete_json(&self, messages: Vec<ChatMessage>) -> Result<String, EchoError> {
        self.complete_request(ProviderRequest::new(messages).with_json_response())
            .await
    }

    pub async fn complete_request(&self, request: ProviderRequest) -> Result<String, EchoError> {
        let mut attempt = 1;
        loop {
            match self.provider.complete(request.clone()).await {
                Ok(response) => {
                    debug!(attempt, model = %response.model, "completion succeeded");
                    return Ok(response.content);
                }
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_after(attempt);
                    warn!(
                        attempt,
                        delay_secs = delay.as_secs(),
                        error = %e,
                        "completion failed, retrying"
                    );
                    counter!(RETRIES_METRIC, "provider" => self.provider.name().to_string())
                        .increment(1);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

async fn advance(provider: &dyn ProviderAdapter, mut phase: Phase) -> Option<(String, Phase)> {
    loop {
        phase = match phase {
            Phase::Pending(request) => match provider.stream(request).await {
                Ok(inner) => Phase::Streaming(inner),
                Err(e) => {
                    warn!(error = %e, "stream failed to start");
                    return Some((error_marker(&e), Phase::Done));
                }
            },
            Phase::Streaming(mut inner) => match inner.next().await {
                Some(Ok(chunk)) if chunk.text.is_empty() => Phase::Streaming(inner),
                Some(Ok(chunk)) => return Some((chunk.text, Phase::Streaming(inner))),
                Some(Err(e)) => {
                    warn!(error = %e, "stream broke mid-response");
                    return Some((error_marker(&e), Phase::Done));
                }
                None => return None,
            },
            Phase::Done => return None,
        };
    }
}
