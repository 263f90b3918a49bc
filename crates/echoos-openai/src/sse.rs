// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE parsing for streamed chat completions.
//!
//! Every event carries a JSON [`ChatCompletionChunk`] until the literal
//! `[DONE]` sentinel, which ends the stream.

use std::pin::Pin;

use echoos_core::EchoError;
use eventsource_stream::Eventsource;
use futures::future;
use futures::stream::{Stream, StreamExt};

use crate::types::ChatCompletionChunk;

/// Sentinel payload that terminates a completion stream.
const DONE_SENTINEL: &str = "[DONE]";

/// Parses a streaming response body into completion chunks.
pub fn parse_sse_stream(
    response: reqwest::Response,
) -> Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, EchoError>> + Send>> {
    let events = response
        .bytes_stream()
        .eventsource()
        .take_while(|result| {
            future::ready(!matches!(result, Ok(event) if event.data.trim() == DONE_SENTINEL))
        })
        .filter_map(|result| async move {
            match result {
                Ok(event) if event.data.trim().is_empty() => None,
                Ok(event) => Some(
                    serde_json::from_str::<ChatCompletionChunk>(&event.data).map_err(|e| {
                        EchoError::Provider {
                            message: format!("failed to parse completion chunk: {e}"),
                            source: Some(Box::new(e)),
                        }
                    }),
                ),
                Err(e) => Some(Err(EchoError::Provider {
                    message: format!("SSE stream error: {e}"),
                    source: None,
                })),
            }
        });

    Box::pin(events)
}
