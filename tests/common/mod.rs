//! Shared test utilities for symcheck integration tests.
//!
//! Builds routers wired to a wiremock model provider and drives them through
//! `tower::Service::call`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use symcheck::api::{create_router, AppState};
use symcheck::config::SymcheckConfig;
use tower::Service;
use wiremock::MockServer;

/// Bearer credential placed in each test's key variable.
pub const TEST_API_KEY: &str = "test-key";

/// UUID v4 string length: "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
pub const UUID_V4_STRING_LEN: usize = 36;

/// Config pointing at `mock`, reading the key from `key_var`.
///
/// Every test uses its own `key_var` so parallel tests never race on the
/// process environment.
pub fn test_config(mock: &MockServer, key_var: &str) -> SymcheckConfig {
    let mut config = SymcheckConfig::default();
    config.model.base_url = mock.uri();
    config.model.api_key_env = key_var.to_string();
    config.model.timeout_seconds = 5;
    config
}

/// Router with the API key set.
pub fn create_test_app(config: SymcheckConfig) -> Router {
    std::env::set_var(&config.model.api_key_env, TEST_API_KEY);
    build_router(config)
}

/// Router whose API key variable is unset.
pub fn create_test_app_without_key(config: SymcheckConfig) -> Router {
    std::env::remove_var(&config.model.api_key_env);
    build_router(config)
}

fn build_router(config: SymcheckConfig) -> Router {
    let state = AppState::from_config(Arc::new(config)).unwrap();
    create_router(Arc::new(state))
}

/// Chat-completion envelope carrying `content`.
pub fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "llama-3.3-70b-versatile",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// Decoded response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub raw: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.raw).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// POST a raw body to `/api/analyze`, optionally as a forwarded client.
pub async fn post_analyze(app: &mut Router, body: &str, client: Option<&str>) -> TestResponse {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header("content-type", "application/json");
    if let Some(client) = client {
        builder = builder.header("x-forwarded-for", client);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

/// GET `uri`.
pub async fn get(app: &mut Router, uri: &str) -> TestResponse {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

/// Send an arbitrary request.
pub async fn send(app: &mut Router, request: Request<Body>) -> TestResponse {
    let response = app.call(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let raw = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    TestResponse { status, headers, raw }
}
