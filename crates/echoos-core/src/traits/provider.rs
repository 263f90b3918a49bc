// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for text-generation integrations.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::EchoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse, ProviderStreamChunk};

/// A boxed stream of response fragments from a provider.
pub type ProviderStream =
    Pin<Box<dyn Stream<Item = Result<ProviderStreamChunk, EchoError>> + Send>>;

/// Adapter for language model APIs, supporting single-shot completion and
/// incremental streaming.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, EchoError>;

    /// Sends a completion request and returns a stream of response chunks.
    async fn stream(&self, request: ProviderRequest) -> Result<ProviderStream, EchoError>;
}
