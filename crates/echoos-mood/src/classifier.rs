// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-tier mood detection and the chat-turn mood heuristic.
//!
//! `detect` tries the keyword table first and asks the provider only when no
//! category matches. It never returns an error.

use std::sync::Arc;

use echoos_core::traits::ProviderAdapter;
use echoos_core::types::{ChatMessage, ProviderRequest};
use echoos_core::EchoError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::keywords::{contains_any, match_emotion, HAPPY_WORDS, SAD_WORDS, STRESS_WORDS};

/// Intensity reported for every keyword hit.
pub const KEYWORD_INTENSITY: u8 = 5;

const FALLBACK_PROMPT: &str = "Analyze the emotion of the user's text. \
     Return JSON with 'emotion' (str) and 'intensity' (1-10 int).";

/// An emotion label with an intensity in `1..=10`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodResult {
    pub emotion: String,
    pub intensity: u8,
}

impl MoodResult {
    pub fn new(emotion: impl Into<String>, intensity: u8) -> Self {
        Self {
            emotion: emotion.into(),
            intensity: intensity.clamp(1, 10),
        }
    }

    /// Returned when the provider tier fails or answers garbage.
    pub fn fallback() -> Self {
        Self::new("neutral", 1)
    }
}

/// Mood annotation sent ahead of a streamed chat answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnMood {
    pub mood: &'static str,
    pub suggested_action: Option<&'static str>,
}

/// Synchronous turn heuristic. Performs no I/O.
pub fn quick_read(text: &str) -> TurnMood {
    let lower = text.to_lowercase();
    let (mood, suggested_action) = if contains_any(&lower, STRESS_WORDS) {
        ("stressed", Some("Take a break"))
    } else if contains_any(&lower, HAPPY_WORDS) {
        ("happy", None)
    } else if contains_any(&lower, SAD_WORDS) {
        ("sad", None)
    } else {
        ("neutral", None)
    };
    TurnMood {
        mood,
        suggested_action,
    }
}

#[derive(Deserialize)]
struct ProviderMood {
    emotion: String,
    intensity: Value,
}

/// Parses the provider's JSON answer. Integral floats and numeric strings are accepted.
fn parse_provider_mood(content: &str) -> Result<MoodResult, EchoError> {
    let parse_err = |message: String| EchoError::Parse { message };
    let raw: ProviderMood = serde_json::from_str(content.trim())
        .map_err(|e| parse_err(format!("mood response is not a mood object: {e}")))?;
    let emotion = raw.emotion.trim().to_string();
    if emotion.is_empty() {
        return Err(parse_err("mood response has an empty emotion".into()));
    }
    let intensity = match &raw.intensity {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| parse_err(format!("mood intensity {} is not a number", raw.intensity)))?;
    Ok(MoodResult::new(emotion, intensity.clamp(1, 10) as u8))
}

/// Keyword-first mood classifier with a provider fallback.
#[derive(Clone)]
pub struct MoodClassifier {
    provider: Arc<dyn ProviderAdapter>,
}

impl MoodClassifier {
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self { provider }
    }

    pub async fn detect(&self, text: &str) -> MoodResult {
        if let Some(emotion) = match_emotion(text) {
            debug!(emotion, "mood matched keyword table");
            return MoodResult::new(emotion, KEYWORD_INTENSITY);
        }
        self.ask_provider(text).await
    }

    async fn ask_provider(&self, text: &str) -> MoodResult {
        let request = ProviderRequest::new(vec![
            ChatMessage::system(FALLBACK_PROMPT),
            ChatMessage::user(text),
        ])
        .with_json_response();

        match self.provider.complete(request).await {
            Ok(response) => parse_provider_mood(&response.content).unwrap_or_else(|e| {
                warn!(error = %e, content = %response.content, "unparseable mood response");
                MoodResult::fallback()
            }),
            Err(e) => {
                warn!(error = %e, "mood provider call failed");
                MoodResult::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echoos_test_utils::MockProvider;

    fn classifier(provider: Arc<MockProvider>) -> MoodClassifier {
        MoodClassifier::new(provider)
    }

    #[tokio::test]
    async fn keyword_hit_skips_provider() {
        let provider = Arc::new(MockProvider::new());
        let mood = classifier(provider.clone())
            .detect("I am so happy and excited today")
            .await;
        assert_eq!(mood, MoodResult::new("happy", 5));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn no_keyword_asks_provider_in_json_mode() {
        let provider = Arc::new(MockProvider::with_responses(vec![
            r#"{"emotion": " Calm ", "intensity": 3}"#.into(),
        ]));
        let mood = classifier(provider.clone()).detect("the sky is blue").await;
        assert_eq!(mood, MoodResult::new("Calm", 3));

        let requests = provider.requests().await;
        assert_eq!(requests.len(), 1);
        assert!(requests[0].json_response);
        assert_eq!(requests[0].messages[1].content, "the sky is blue");
    }

    #[tokio::test]
    async fn empty_text_falls_through_and_provider_failure_is_neutral() {
        let provider = Arc::new(MockProvider::always_failing());
        let mood = classifier(provider.clone()).detect("").await;
        assert_eq!(mood, MoodResult::new("neutral", 1));
        assert_eq!(provider.complete_calls(), 1);
    }

    #[tokio::test]
    async fn unparseable_answer_is_neutral() {
        let provider = Arc::new(MockProvider::with_responses(vec!["calm, 3".into()]));
        assert_eq!(
            classifier(provider).detect("the sky is blue").await,
            MoodResult::fallback()
        );
    }

    #[test]
    fn provider_intensity_is_clamped_and_coerced() {
        let parsed = |raw: &str| parse_provider_mood(raw).ok();
        assert_eq!(
            parsed(r#"{"emotion":"elated","intensity":42}"#),
            Some(MoodResult::new("elated", 10))
        );
        assert_eq!(
            parsed(r#"{"emotion":"tired","intensity":0}"#),
            Some(MoodResult::new("tired", 1))
        );
        assert_eq!(
            parsed(r#"{"emotion":"tired","intensity":"7"}"#),
            Some(MoodResult::new("tired", 7))
        );
        assert_eq!(
            parsed(r#"{"emotion":"tired","intensity":6.6}"#),
            Some(MoodResult::new("tired", 7))
        );
    }

    #[test]
    fn malformed_provider_answers_are_parse_errors() {
        for raw in [
            r#"{"emotion":"","intensity":4}"#,
            r#"{"intensity":4}"#,
            r#"{"emotion":"tired","intensity":null}"#,
            "not json",
        ] {
            assert!(
                matches!(parse_provider_mood(raw), Err(EchoError::Parse { .. })),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn turn_heuristic_prefers_stress() {
        assert_eq!(
            quick_read("So busy but happy"),
            TurnMood {
                mood: "stressed",
                suggested_action: Some("Take a break")
            }
        );
        assert_eq!(quick_read("Great news!").mood, "happy");
        assert_eq!(quick_read("feeling bad").mood, "sad");
        assert_eq!(quick_read("what time is it").suggested_action, None);
        assert_eq!(quick_read("what time is it").mood, "neutral");
    }
}
