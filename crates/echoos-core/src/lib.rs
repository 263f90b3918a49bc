// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the EchoOS assistant backend.
//!
//! This crate provides the error taxonomy, adapter traits, and shared types
//! used by every pipeline crate. The embedding provider, the vector index,
//! and the generation provider are all reached through traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::EchoError;
pub use types::{
    AdapterType, ChatMessage, EmbeddingInput, EmbeddingOutput, HealthStatus, ProviderRequest,
    ProviderResponse, ProviderStreamChunk, RetrievalResult, Role, VectorMatch, VectorMetadata,
};

pub use traits::{
    validate_batch, EmbeddingAdapter, PluginAdapter, ProviderAdapter, ProviderStream,
    VectorIndexAdapter,
};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn retryable_errors_are_provider_and_timeout() {
        let provider = EchoError::Provider {
            message: "503".into(),
            source: None,
        };
        let timeout = EchoError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        assert!(provider.is_retryable());
        assert!(timeout.is_retryable());

        assert!(!EchoError::Config("missing key".into()).is_retryable());
        assert!(!EchoError::Validation("bad batch".into()).is_retryable());
        assert!(!EchoError::NotFound("Unknown agent: x".into()).is_retryable());
        assert!(
            !EchoError::Storage {
                source: Box::new(std::io::Error::other("disk")),
            }
            .is_retryable()
        );
    }

    #[test]
    fn not_found_displays_bare_message() {
        let err = EchoError::NotFound("Unknown agent: unknown-agent".into());
        assert_eq!(err.to_string(), "Unknown agent: unknown-agent");
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Provider,
            AdapterType::Embedding,
            AdapterType::VectorIndex,
            AdapterType::Storage,
        ] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn role_serializes_lowercase() {
        let msg = ChatMessage::system("be brief");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "be brief");
    }

    #[test]
    fn match_text_skips_missing_and_empty() {
        let mut metadata = VectorMetadata::new();
        let mut m = VectorMatch {
            id: "a".into(),
            score: 0.9,
            metadata: metadata.clone(),
        };
        assert_eq!(m.text(), None);

        metadata.insert("text".into(), serde_json::json!(""));
        m.metadata = metadata.clone();
        assert_eq!(m.text(), None);

        metadata.insert("text".into(), serde_json::json!(42));
        m.metadata = metadata.clone();
        assert_eq!(m.text(), None);

        metadata.insert("text".into(), serde_json::json!("Gym at 7"));
        m.metadata = metadata;
        assert_eq!(m.text(), Some("Gym at 7"));
    }

    #[test]
    fn validate_batch_rejects_three_ids_two_vectors() {
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let vectors = vec![vec![0.1], vec![0.2]];
        let metadata = vec![VectorMetadata::new(); 3];
        let err = validate_batch(&ids, &vectors, &metadata).unwrap_err();
        assert!(matches!(err, EchoError::Validation(_)));
    }

    proptest! {
        #[test]
        fn validate_batch_accepts_only_equal_lengths(
            n_ids in 0usize..6,
            n_vectors in 0usize..6,
            n_meta in 0usize..6,
        ) {
            let ids: Vec<String> = (0..n_ids).map(|i| i.to_string()).collect();
            let vectors = vec![vec![0.0f32; 2]; n_vectors];
            let metadata = vec![VectorMetadata::new(); n_meta];
            let ok = validate_batch(&ids, &vectors, &metadata).is_ok();
            prop_assert_eq!(ok, n_ids == n_vectors && n_ids == n_meta);
        }
    }
}
