// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat turn event stream.
//!
//! Every turn emits exactly `metadata`, then zero or more content events,
//! then `done`:
//!
//! ```text
//! event: metadata
//! data: {"mood":"stressed","suggested_action":"Take a break"}
//!
//! data: {"content":"Hel"}
//!
//! event: done
//! data: [DONE]
//! ```
//!
//! Metadata is computed from the raw input before any I/O. Retrieval and
//! the generation call start only after metadata has been pulled, and stop
//! when the stream is dropped.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::response::sse::Event;
use echoos_generation::FragmentStream;
use echoos_mood::TurnMood;
use futures::future::BoxFuture;
use futures::stream::Stream;
use futures::{FutureExt, StreamExt};

/// Payload of the terminal event.
pub const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    Metadata(TurnMood),
    Content(String),
    Done,
}

impl ChatEvent {
    pub fn into_sse(self) -> Event {
        match self {
            ChatEvent::Metadata(mood) => Event::default()
                .event("metadata")
                .data(serde_json::to_string(&mood).unwrap_or_else(|_| "{}".into())),
            ChatEvent::Content(text) => {
                Event::default().data(serde_json::json!({ "content": text }).to_string())
            }
            ChatEvent::Done => Event::default().event("done").data(DONE_SENTINEL),
        }
    }
}

enum Phase {
    Metadata(TurnMood, BoxFuture<'static, FragmentStream>),
    Preparing(BoxFuture<'static, FragmentStream>),
    Content(FragmentStream),
    Done,
    Finished,
}

/// The per-turn state machine. `prepare` resolves to the fragment source.
pub struct ChatEventStream {
    phase: Phase,
}

impl ChatEventStream {
    pub fn new<F>(mood: TurnMood, prepare: F) -> Self
    where
        F: std::future::Future<Output = FragmentStream> + Send + 'static,
    {
        Self {
            phase: Phase::Metadata(mood, prepare.boxed()),
        }
    }

    /// The stream as axum SSE events.
    pub fn into_sse(self) -> impl Stream<Item = Result<Event, Infallible>> + Send {
        self.map(|event| Ok(event.into_sse()))
    }
}

impl Stream for ChatEventStream {
    type Item = ChatEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<ChatEvent>> {
        let this = self.get_mut();
        loop {
            match std::mem::replace(&mut this.phase, Phase::Finished) {
                Phase::Metadata(mood, prepare) => {
                    this.phase = Phase::Preparing(prepare);
                    return Poll::Ready(Some(ChatEvent::Metadata(mood)));
                }
                Phase::Preparing(mut prepare) => match prepare.poll_unpin(cx) {
                    Poll::Ready(fragments) => this.phase = Phase::Content(fragments),
                    Poll::Pending => {
                        this.phase = Phase::Preparing(prepare);
                        return Poll::Pending;
                    }
                },
                Phase::Content(mut fragments) => match fragments.poll_next_unpin(cx) {
                    Poll::Ready(Some(text)) => {
                        this.phase = Phase::Content(fragments);
                        return Poll::Ready(Some(ChatEvent::Content(text)));
                    }
                    Poll::Ready(None) => this.phase = Phase::Done,
                    Poll::Pending => {
                        this.phase = Phase::Content(fragments);
                        return Poll::Pending;
                    }
                },
                Phase::Done => return Poll::Ready(Some(ChatEvent::Done)),
                Phase::Finished => return Poll::Ready(None),
            }
        }
    }
}
