// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Pinecone data-plane and control-plane REST APIs.

use echoos_core::types::{VectorMatch, VectorMetadata};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct UpsertRequest {
    pub vectors: Vec<ApiVector>,
}

#[derive(Debug, Serialize)]
pub struct ApiVector {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: VectorMetadata,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertResponse {
    #[serde(default)]
    pub upserted_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub vector: Vec<f32>,
    pub top_k: usize,
    pub include_metadata: bool,
    pub include_values: bool,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub matches: Vec<VectorMatch>,
}

#[derive(Debug, Serialize)]
pub struct DeleteRequest {
    pub ids: Vec<String>,
}

/// Subset of `GET /indexes/{name}` used to find the data-plane host.
#[derive(Debug, Deserialize)]
pub struct IndexDescription {
    pub host: String,
}
