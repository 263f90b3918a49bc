// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use echoos_core::types::ChatMessage;

/// One chat exchange as sent to the provider. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub system_prompt: String,
    pub user_text: String,
    /// Retrieved context. `None` unless retrieval produced text.
    pub context: Option<String>,
}

impl ChatTurn {
    /// An empty `context` leaves the system prompt untouched.
    pub fn new(
        system_prompt: impl Into<String>,
        user_text: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        let context = context.into();
        Self {
            system_prompt: system_prompt.into(),
            user_text: user_text.into(),
            context: (!context.is_empty()).then_some(context),
        }
    }

    pub fn system_message(&self) -> String {
        match &self.context {
            Some(context) => format!(
                "{}\n\nRelevant Context from Memory:\n{context}\n\n\
                 Use this context to answer the user's question if relevant.",
                self.system_prompt
            ),
            None => self.system_prompt.clone(),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_message()),
            ChatMessage::user(self.user_text.clone()),
        ]
    }
}
