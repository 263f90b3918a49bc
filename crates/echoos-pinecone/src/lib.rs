// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pinecone vector index adapter for EchoOS.
//!
//! [`PineconeIndex`] implements [`VectorIndexAdapter`] over Pinecone's REST
//! API. The API key and index name are read from configuration on every call,
//! so a missing value is reported as [`EchoError::Config`] at the point of
//! use rather than at startup.

pub mod types;

use async_trait::async_trait;
use dashmap::DashMap;
use echoos_config::model::PineconeConfig;
use echoos_core::traits::{validate_batch, PluginAdapter, VectorIndexAdapter};
use echoos_core::types::{AdapterType, HealthStatus, RetrievalResult, VectorMetadata};
use echoos_core::EchoError;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::types::{
    ApiVector, DeleteRequest, IndexDescription, QueryRequest, QueryResponse, UpsertRequest,
    UpsertResponse,
};

/// Vector index backed by a Pinecone serverless or pod index.
pub struct PineconeIndex {
    client: reqwest::Client,
    config: PineconeConfig,
    /// Data-plane host per index name, filled from the control plane.
    hosts: DashMap<String, String>,
}

impl PineconeIndex {
    /// Creates the adapter. Performs no I/O and needs no credentials yet.
    pub fn new(config: &PineconeConfig) -> Result<Self, EchoError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| EchoError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        if let Some(environment) = &config.environment {
            info!(environment = %environment, "Pinecone environment hint (informational)");
        }

        Ok(Self {
            client,
            config: config.clone(),
            hosts: DashMap::new(),
        })
    }

    fn api_key(&self) -> Result<&str, EchoError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                EchoError::Config("Pinecone API key is not set (pinecone.api_key or PINECONE_KEY)".into())
            })
    }

    fn index_name(&self) -> Result<&str, EchoError> {
        self.config
            .index_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                EchoError::Config(
                    "Pinecone index name is not set (pinecone.index_name or PINECONE_INDEX)".into(),
                )
            })
    }

    /// Data-plane base URL for the configured index.
    async fn index_host(&self) -> Result<String, EchoError> {
        let api_key = self.api_key()?;
        let index_name = self.index_name()?;

        if let Some(host) = &self.config.index_host {
            return Ok(with_scheme(host));
        }
        if let Some(host) = self.hosts.get(index_name) {
            return Ok(host.clone());
        }

        let url = format!(
            "{}/indexes/{index_name}",
            self.config.control_plane_url.trim_end_matches('/')
        );
        let response = self
            .client
            .get(&url)
            .header("Api-Key", api_key)
            .header("X-Pinecone-API-Version", &self.config.api_version)
            .send()
            .await
            .map_err(transport_err)?;
        let description: IndexDescription = read_json(response, "describe index").await?;

        let host = with_scheme(&description.host);
        debug!(index = index_name, host = %host, "resolved Pinecone index host");
        self.hosts.insert(index_name.to_string(), host.clone());
        Ok(host)
    }

    async fn post<T: serde::Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<R, EchoError> {
        let host = self.index_host().await?;
        let response = self
            .client
            .post(format!("{}/{endpoint}", host.trim_end_matches('/')))
            .header("Api-Key", self.api_key()?)
            .header("X-Pinecone-API-Version", &self.config.api_version)
            .json(body)
            .send()
            .await
            .map_err(transport_err)?;
        read_json(response, endpoint).await
    }
}

fn with_scheme(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

fn transport_err(e: reqwest::Error) -> EchoError {
    EchoError::Provider {
        message: format!("Pinecone request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

async fn read_json<R: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<R, EchoError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(EchoError::Provider {
            message: format!("Pinecone {what} returned {status}: {body}"),
            source: None,
        });
    }
    // Delete answers with an empty object, which every response type accepts.
    response.json::<R>().await.map_err(|e| EchoError::Provider {
        message: format!("failed to parse Pinecone {what} response: {e}"),
        source: Some(Box::new(e)),
    })
}

#[async_trait]
impl PluginAdapter for PineconeIndex {
    fn name(&self) -> &str {
        "pinecone"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::VectorIndex
    }

    async fn health_check(&self) -> Result<HealthStatus, EchoError> {
        match (self.api_key(), self.index_name()) {
            (Ok(_), Ok(_)) => Ok(HealthStatus::Healthy),
            (Err(e), _) | (_, Err(e)) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), EchoError> {
        Ok(())
    }
}

#[async_trait]
impl VectorIndexAdapter for PineconeIndex {
    async fn upsert(
        &self,
        ids: Vec<String>,
        vectors: Vec<Vec<f32>>,
        metadata: Vec<VectorMetadata>,
    ) -> Result<usize, EchoError> {
        validate_batch(&ids, &vectors, &metadata)?;
        if ids.is_empty() {
            return Ok(0);
        }

        let request = UpsertRequest {
            vectors: ids
                .into_iter()
                .zip(vectors)
                .zip(metadata)
                .map(|((id, values), metadata)| ApiVector {
                    id,
                    values,
                    metadata,
                })
                .collect(),
        };
        let response: UpsertResponse = self.post("vectors/upsert", &request).await?;
        debug!(count = response.upserted_count, "vectors upserted");
        Ok(response.upserted_count)
    }

    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<RetrievalResult, EchoError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
        };
        let response: QueryResponse = self.post("query", &request).await?;
        Ok(response.matches)
    }

    async fn delete(&self, ids: Vec<String>) -> Result<(), EchoError> {
        if ids.is_empty() {
            return Ok(());
        }
        let _: serde_json::Value = self.post("vectors/delete", &DeleteRequest { ids }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(host: Option<String>) -> PineconeConfig {
        PineconeConfig {
            api_key: Some("pc-test".into()),
            index_name: Some("memories".into()),
            index_host: host,
            ..PineconeConfig::default()
        }
    }

    fn meta(text: &str) -> VectorMetadata {
        let mut m = VectorMetadata::new();
        m.insert("text".into(), serde_json::json!(text));
        m
    }

    #[tokio::test]
    async fn health_reports_missing_index_name() {
        let healthy = PineconeIndex::new(&config(None)).unwrap();
        assert_eq!(healthy.health_check().await.unwrap(), HealthStatus::Healthy);

        let index = PineconeIndex::new(&PineconeConfig {
            index_name: None,
            ..config(None)
        })
        .unwrap();
        assert!(matches!(
            index.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn mismatched_batch_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let index = PineconeIndex::new(&config(Some(server.uri()))).unwrap();
        let err = index
            .upsert(
                vec!["a".into(), "b".into(), "c".into()],
                vec![vec![0.1], vec![0.2]],
                vec![meta("a"), meta("b"), meta("c")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EchoError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_index_name_is_config_error() {
        let mut cfg = config(None);
        cfg.index_name = None;
        let index = PineconeIndex::new(&cfg).unwrap();

        let err = index.query(vec![0.1], 3).await.unwrap_err();
        assert!(matches!(err, EchoError::Config(ref m) if m.contains("PINECONE_INDEX")));
    }

    #[tokio::test]
    async fn missing_api_key_is_config_error() {
        let mut cfg = config(None);
        cfg.api_key = None;
        let index = PineconeIndex::new(&cfg).unwrap();

        let err = index
            .upsert(vec!["a".into()], vec![vec![0.1]], vec![meta("a")])
            .await
            .unwrap_err();
        assert!(matches!(err, EchoError::Config(ref m) if m.contains("PINECONE_KEY")));
    }

    #[tokio::test]
    async fn upsert_sends_vectors_with_metadata() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/vectors/upsert"))
            .and(header("api-key", "pc-test"))
            .and(body_partial_json(serde_json::json!({
                "vectors": [{"id": "mem-1", "values": [0.5, 0.25], "metadata": {"text": "hello"}}]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"upsertedCount": 1})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let index = PineconeIndex::new(&config(Some(server.uri()))).unwrap();
        let count = index
            .upsert(vec!["mem-1".into()], vec![vec![0.5, 0.25]], vec![meta("hello")])
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn query_returns_matches_with_metadata() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_partial_json(
                serde_json::json!({"topK": 2, "includeMetadata": true}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "matches": [
                    {"id": "m1", "score": 0.92, "metadata": {"text": "first"}},
                    {"id": "m2", "score": 0.81, "metadata": {"text": "second"}}
                ],
                "namespace": ""
            })))
            .mount(&server)
            .await;

        let index = PineconeIndex::new(&config(Some(server.uri()))).unwrap();
        let matches = index.query(vec![0.1, 0.2], 2).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "m1");
        assert_eq!(matches[1].text(), Some("second"));
    }

    #[tokio::test]
    async fn host_is_resolved_once_from_control_plane() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/indexes/memories"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"host": server.uri()})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"matches": []})))
            .expect(2)
            .mount(&server)
            .await;

        let mut cfg = config(None);
        cfg.control_plane_url = server.uri();
        let index = PineconeIndex::new(&cfg).unwrap();

        index.query(vec![0.1], 3).await.unwrap();
        index.query(vec![0.1], 3).await.unwrap();
    }

    #[tokio::test]
    async fn delete_posts_ids() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/vectors/delete"))
            .and(body_partial_json(serde_json::json!({"ids": ["mem-1"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let index = PineconeIndex::new(&config(Some(server.uri()))).unwrap();
        index.delete(vec!["mem-1".into()]).await.unwrap();
    }

    #[tokio::test]
    async fn server_error_is_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let index = PineconeIndex::new(&config(Some(server.uri()))).unwrap();
        let err = index.query(vec![0.1], 3).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
