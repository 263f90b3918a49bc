// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of the HTTP surface over mock collaborators.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use echoos_agent::{AgentRegistry, Dispatcher};
use echoos_config::model::EchoConfig;
use echoos_gateway::{router, AppState, GatewaySettings};
use echoos_generation::{GenerationEngine, RetryPolicy};
use echoos_memory::{MemoryService, RetrievalOrchestrator, TextVectorizer};
use echoos_mood::MoodClassifier;
use echoos_storage::{Database, MemoryStore};
use echoos_test_utils::{InMemoryIndex, MockEmbedder, MockProvider, StreamScript};
use serde_json::{json, Value};
use tower::ServiceExt;

struct Harness {
    app: Router,
    embedder: Arc<MockEmbedder>,
    index: Arc<InMemoryIndex>,
    provider: Arc<MockProvider>,
}

async fn harness() -> Harness {
    let config = EchoConfig::default();
    let embedder = Arc::new(MockEmbedder::new());
    let index = Arc::new(InMemoryIndex::new());
    let provider = Arc::new(MockProvider::new());

    let store = MemoryStore::new(Database::open_in_memory().await.unwrap());
    let vectorizer = TextVectorizer::new(embedder.clone());
    let retrieval = RetrievalOrchestrator::new(vectorizer.clone(), index.clone());
    let engine = GenerationEngine::new(provider.clone(), RetryPolicy::default());
    let registry = AgentRegistry::standard(
        retrieval.clone(),
        engine.clone(),
        config.retrieval.agent_top_k,
    );

    let state = AppState::new(
        MemoryService::new(store, vectorizer, index.clone()),
        retrieval,
        engine,
        MoodClassifier::new(provider.clone()),
        Dispatcher::new(Arc::new(registry)),
        GatewaySettings::from_config(&config),
    );

    Harness {
        app: router(state),
        embedder,
        index,
        provider,
    }
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_str(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn root_and_health_respond() {
    let h = harness().await;
    let (status, body) = send_json(&h.app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to EchoOS API");

    let (status, body) =
        send_json(&h.app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn chat_streams_metadata_content_done_with_context() {
    let h = harness().await;
    let (status, _) = send_json(
        &h.app,
        post_json("/api/memory/save", json!({"text": "Dentist appointment on Friday"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    h.provider
        .push_stream(StreamScript::fragments(&["It is ", "on Friday."]))
        .await;

    let (status, body) = send(
        &h.app,
        post_json("/api/chat", json!({"input": "Dentist appointment on Friday"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let metadata = body.find("event: metadata").expect("metadata event");
    let first = body.find(r#"data: {"content":"It is "}"#).expect("first fragment");
    let second = body.find(r#"data: {"content":"on Friday."}"#).expect("second fragment");
    let done = body.find("event: done\ndata: [DONE]").expect("done event");
    assert!(metadata < first && first < second && second < done);
    assert!(body[..first].contains(r#""mood":"neutral""#));
    assert!(body[..first].contains(r#""suggested_action":null"#));
    assert_eq!(body.matches("event: metadata").count(), 1);
    assert_eq!(body.matches("event: done").count(), 1);

    let request = &h.provider.requests().await[0];
    assert!(request.messages[0]
        .content
        .contains("Relevant Context from Memory:\nDentist appointment on Friday"));
    assert_eq!(request.messages[1].content, "Dentist appointment on Friday");
}

#[tokio::test]
async fn chat_without_retrieval_omits_context() {
    let h = harness().await;
    h.embedder.set_failing(true);

    let (status, body) = send(
        &h.app,
        post_json("/api/chat", json!({"input": "Such a stressful deadline"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""suggested_action":"Take a break""#));
    assert!(body.contains(r#"data: {"content":"mock "}"#));

    let request = &h.provider.requests().await[0];
    assert!(!request.messages[0].content.contains("Relevant Context"));
    assert_eq!(h.index.query_calls(), 0);
}

#[tokio::test]
async fn chat_provider_failure_ends_with_error_text_then_done() {
    let h = harness().await;
    h.provider
        .push_stream(StreamScript::FailAfter(vec!["Part".into()], "socket closed".into()))
        .await;

    let (status, body) = send(&h.app, post_json("/api/chat", json!({"input": "hi"}))).await;
    assert_eq!(status, StatusCode::OK);
    let error = body.find("Error: ").expect("error marker");
    let done = body.find("event: done").expect("done");
    assert!(error < done);
    assert!(body.contains("socket closed"));
}

#[tokio::test]
async fn memory_save_list_search_forget() {
    let h = harness().await;

    let (status, saved) = send_json(
        &h.app,
        Request::post("/api/memory/save")
            .header("content-type", "application/json")
            .header("x-user-id", "alice")
            .body(Body::from(
                json!({"text": "Call mom", "tags": ["family"], "emotion": "happy"}).to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["status"], "saved");
    let id = saved["id"].as_str().unwrap().to_string();
    assert!(h.index.entry(&id).await.is_some());

    let (_, listed) = send_json(
        &h.app,
        Request::get("/api/memory/all")
            .header("x-user-id", "alice")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let memories = listed["memories"].as_array().unwrap();
    assert_eq!(memories.len(), 1);
    assert_eq!(memories[0]["text"], "Call mom");
    assert_eq!(memories[0]["emotion"], "happy");

    let (_, other) = send_json(
        &h.app,
        Request::get("/api/memory/all?user_id=bob").body(Body::empty()).unwrap(),
    )
    .await;
    assert!(other["memories"].as_array().unwrap().is_empty());

    let (status, matches) = send_json(
        &h.app,
        Request::get("/api/memory/search?q=Call%20mom&limit=3")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(matches[0]["id"], id.as_str());
    assert_eq!(matches[0]["metadata"]["memory_id"], id.as_str());

    let (status, _) = send(
        &h.app,
        Request::delete(format!("/api/memory/{id}"))
            .header("x-user-id", "alice")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(h.index.entry(&id).await.is_none());

    let (status, body) = send_json(
        &h.app,
        Request::delete(format!("/api/memory/{id}"))
            .header("x-user-id", "alice")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains(&id));
}

#[tokio::test]
async fn forget_accepts_owner_from_query() {
    let h = harness().await;
    let (_, saved) = send_json(
        &h.app,
        post_json("/api/memory/save", json!({"text": "Call mom", "user_id": "carol"})),
    )
    .await;
    let id = saved["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &h.app,
        Request::delete(format!("/api/memory/{id}?user_id=bob"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &h.app,
        Request::delete(format!("/api/memory/{id}?user_id=carol"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = send_json(
        &h.app,
        Request::get("/api/memory/all?user_id=carol").body(Body::empty()).unwrap(),
    )
    .await;
    assert!(listed["memories"].as_array().unwrap().is_empty());
    assert!(h.index.entry(&id).await.is_none());
}

#[tokio::test]
async fn save_with_bad_timestamp_is_unprocessable() {
    let h = harness().await;
    let (status, body) = send_json(
        &h.app,
        post_json("/api/memory/save", json!({"text": "x", "timestamp": "soon"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("timestamp"));
    assert_eq!(h.embedder.calls(), 0);
}

#[tokio::test]
async fn reindex_restores_missing_vectors() {
    let h = harness().await;
    h.index.set_failing(true);
    let (_, saved) = send_json(
        &h.app,
        post_json("/api/memory/save", json!({"text": "offline note", "user_id": "carol"})),
    )
    .await;
    let id = saved["id"].as_str().unwrap().to_string();
    h.index.set_failing(false);
    assert!(h.index.entry(&id).await.is_none());

    let (status, body) = send_json(
        &h.app,
        Request::post("/api/memory/reindex?user_id=carol")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reindexed"], 1);
    assert!(h.index.entry(&id).await.is_some());
}

#[tokio::test]
async fn agents_are_listed() {
    let h = harness().await;
    let (status, body) =
        send_json(&h.app, Request::get("/api/agents").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "id": "research",
                "name": "Research Agent",
                "description": "Searches your memories and summarizes what it finds.",
                "status": "active"
            },
            {
                "id": "coding",
                "name": "Coding Assistant",
                "description": "Helps with code generation and debugging.",
                "status": "coming_soon"
            }
        ])
    );
}

#[tokio::test]
async fn unknown_agent_is_not_found_without_io() {
    let h = harness().await;
    let (status, body) = send_json(
        &h.app,
        post_json("/api/agents/run", json!({"agent_id": "unknown-agent", "input": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown agent: unknown-agent");
    assert_eq!(h.embedder.calls(), 0);
    assert_eq!(h.index.calls(), 0);
    assert_eq!(h.provider.calls(), 0);
}

#[tokio::test]
async fn research_agent_plain_text_is_wrapped() {
    let h = harness().await;
    h.provider.add_response("Just a plain answer.").await;

    let (status, body) = send_json(
        &h.app,
        post_json(
            "/api/agents/run",
            json!({"agent_id": "research", "input": "what did I plan?", "context": {"week": 12}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "result": {"summary": "Just a plain answer.", "suggested_tasks": []},
            "status": "success"
        })
    );
}

#[tokio::test]
async fn mood_endpoint_uses_keywords_first() {
    let h = harness().await;
    let (status, body) = send_json(
        &h.app,
        post_json("/api/mood", json!({"text": "I am so happy and excited today"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"emotion": "happy", "intensity": 5}));
    assert_eq!(h.provider.calls(), 0);
}

#[tokio::test]
async fn research_agent_retrieval_failure_is_internal_error() {
    let h = harness().await;
    h.embedder.set_failing(true);
    h.provider.add_response("Just a plain answer.").await;

    let (status, body) = send_json(
        &h.app,
        post_json("/api/agents/run", json!({"agent_id": "research", "input": "plans?"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("research"));
    assert_eq!(h.provider.calls(), 0);
}
