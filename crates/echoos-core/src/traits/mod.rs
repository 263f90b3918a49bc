// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for the external collaborators of the pipeline.

pub mod adapter;
pub mod embedding;
pub mod provider;
pub mod vector;

pub use adapter::PluginAdapter;
pub use embedding::EmbeddingAdapter;
pub use provider::{ProviderAdapter, ProviderStream};
pub use vector::{validate_batch, VectorIndexAdapter};
