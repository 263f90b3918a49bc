// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted generation provider for deterministic tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;

use echoos_core::traits::{PluginAdapter, ProviderAdapter, ProviderStream};
use echoos_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, ProviderStreamChunk,
};
use echoos_core::EchoError;

/// What one call to `stream` produces.
#[derive(Debug, Clone)]
pub enum StreamScript {
    /// Yields each fragment, then ends.
    Fragments(Vec<String>),
    /// Yields the fragments, then a provider error with the given message.
    FailAfter(Vec<String>, String),
    /// `stream` itself returns a provider error.
    FailToStart(String),
    /// Yields the fragment forever.
    Endless(String),
}

impl StreamScript {
    pub fn fragments(parts: &[&str]) -> Self {
        StreamScript::Fragments(parts.iter().map(|p| p.to_string()).collect())
    }
}

/// A mock provider whose replies are popped from FIFO scripts.
///
/// An empty completion script answers "mock response". An empty stream
/// script streams "mock " then "response".
pub struct MockProvider {
    responses: Mutex<VecDeque<Result<String, String>>>,
    streams: Mutex<VecDeque<StreamScript>>,
    requests: Mutex<Vec<ProviderRequest>>,
    always_fail: AtomicBool,
    complete_calls: AtomicUsize,
    stream_calls: AtomicUsize,
    fragments_pulled: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_script(Vec::new())
    }

    /// A provider pre-loaded with successful completions.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self::with_script(responses.into_iter().map(Ok).collect())
    }

    /// A provider pre-loaded with completion outcomes; `Err` holds the failure message.
    pub fn with_script(script: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(script)),
            streams: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            always_fail: AtomicBool::new(false),
            complete_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
            fragments_pulled: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A provider that fails every completion and stream call.
    pub fn always_failing() -> Self {
        let provider = Self::new();
        provider.always_fail.store(true, Ordering::SeqCst);
        provider
    }

    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(text.into()));
    }

    pub async fn add_failure(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }

    pub async fn push_stream(&self, script: StreamScript) {
        self.streams.lock().await.push_back(script);
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    pub fn complete_calls(&self) -> usize {
        self.complete_calls.load(Ordering::SeqCst)
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    /// Total calls of either kind.
    pub fn calls(&self) -> usize {
        self.complete_calls() + self.stream_calls()
    }

    /// Stream items handed to consumers across all streams.
    pub fn fragments_pulled(&self) -> usize {
        self.fragments_pulled.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn provider_err(message: String) -> EchoError {
    EchoError::Provider {
        message,
        source: None,
    }
}

fn chunk(text: String) -> Result<ProviderStreamChunk, EchoError> {
    Ok(ProviderStreamChunk { text })
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, EchoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EchoError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, EchoError> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);

        if self.always_fail.load(Ordering::SeqCst) {
            return Err(provider_err("mock provider unavailable".into()));
        }

        let next = self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()));
        next.map(|content| ProviderResponse {
            content,
            model: "mock-model".into(),
        })
        .map_err(provider_err)
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ProviderStream, EchoError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);

        if self.always_fail.load(Ordering::SeqCst) {
            return Err(provider_err("mock provider unavailable".into()));
        }

        let script = self
            .streams
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| StreamScript::fragments(&["mock ", "response"]));

        let inner: ProviderStream = match script {
            StreamScript::Fragments(parts) => Box::pin(stream::iter(parts.into_iter().map(chunk))),
            StreamScript::FailAfter(parts, message) => Box::pin(
                stream::iter(parts.into_iter().map(chunk))
                    .chain(stream::once(async move { Err(provider_err(message)) })),
            ),
            StreamScript::FailToStart(message) => return Err(provider_err(message)),
            StreamScript::Endless(part) => {
                Box::pin(stream::repeat_with(move || chunk(part.clone())))
            }
        };

        let pulled = Arc::clone(&self.fragments_pulled);
        Ok(Box::pin(inner.inspect(move |_| {
            pulled.fetch_add(1, Ordering::SeqCst);
        })))
    }
}
