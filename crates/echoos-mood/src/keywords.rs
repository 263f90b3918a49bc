// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword tables. Matching is substring containment on lower-cased text.

/// Emotion categories in priority order. The first category with a hit wins.
pub const EMOTION_KEYWORDS: &[(&str, &[&str])] = &[
    ("happy", &["happy", "joy", "excited", "great", "good", "awesome", "love"]),
    ("sad", &["sad", "depressed", "unhappy", "bad", "terrible", "cry", "grief"]),
    ("angry", &["angry", "mad", "furious", "hate", "rage", "annoyed"]),
    ("anxious", &["anxious", "nervous", "worried", "scared", "fear"]),
    ("neutral", &["okay", "fine", "normal"]),
];

/// Chat-turn heuristic, checked in this order.
pub(crate) const STRESS_WORDS: &[&str] = &["stress", "anxious", "worry", "deadline", "busy"];
pub(crate) const HAPPY_WORDS: &[&str] = &["happy", "great", "good", "excited", "love"];
pub(crate) const SAD_WORDS: &[&str] = &["sad", "bad", "depressed", "unhappy"];

pub(crate) fn contains_any(text_lower: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text_lower.contains(w))
}

/// The first emotion category matching `text`, if any.
pub fn match_emotion(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    EMOTION_KEYWORDS
        .iter()
        .find(|(_, words)| contains_any(&lower, words))
        .map(|(emotion, _)| *emotion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_order_decides_ties() {
        // "sad" and "happy" both match; happy is checked first.
        assert_eq!(match_emotion("happy but sad"), Some("happy"));
        assert_eq!(match_emotion("I HATE mondays"), Some("angry"));
        assert_eq!(match_emotion("feeling nervous"), Some("anxious"));
        assert_eq!(match_emotion("it is fine"), Some("neutral"));
        assert_eq!(match_emotion("the sky is blue"), None);
        assert_eq!(match_emotion(""), None);
    }

    #[test]
    fn matching_is_substring_based() {
        assert_eq!(match_emotion("goodbye"), Some("happy"));
    }
}
