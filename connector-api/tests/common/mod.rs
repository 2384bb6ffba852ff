//! Common test utilities for integration tests
//!
//! - In-memory app construction
//! - Store doubles that fail on demand
//! - Request helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use connector_api::app::{build_router, AppState};
use connector_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use connector_shared::models::user::{CreateUser, User};
use connector_shared::store::{InMemoryUserStore, StoreError, UserStore};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiration_seconds: 360_000,
        },
    }
}

/// App backed by an in-memory store the test can inspect
pub struct TestContext {
    pub store: Arc<InMemoryUserStore>,
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryUserStore::new());
        let app = app_with_store(store.clone());
        Self { store, app }
    }

    pub async fn post_users(&self, body: serde_json::Value) -> TestResponse {
        post_json(&self.app, "/api/users", body).await
    }
}

pub fn app_with_store(store: Arc<dyn UserStore>) -> Router {
    app_with(store, test_config())
}

pub fn app_with(store: Arc<dyn UserStore>, config: Config) -> Router {
    build_router(AppState::new(store, config))
}

/// Which store operation should fail
#[derive(Debug, Clone, Copy)]
pub enum FailOn {
    Lookup,
    Create,
}

/// Store whose operations fail with a backend error
pub struct FailingStore {
    pub fail_on: FailOn,
}

#[async_trait]
impl UserStore for FailingStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        match self.fail_on {
            FailOn::Lookup => Err(StoreError::Backend("connection reset by peer".to_string())),
            FailOn::Create => Ok(None),
        }
    }

    async fn create(&self, _data: CreateUser) -> Result<User, StoreError> {
        Err(StoreError::Backend("disk full".to_string()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "Response is not JSON ({}): {}",
                e,
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// `msg` of every entry in the `errors` array
    pub fn error_messages(&self) -> Vec<String> {
        self.json()["errors"]
            .as_array()
            .expect("errors array")
            .iter()
            .map(|e| e["msg"].as_str().expect("msg string").to_string())
            .collect()
    }

    /// `path` of every entry in the `errors` array
    pub fn error_paths(&self) -> Vec<String> {
        self.json()["errors"]
            .as_array()
            .expect("errors array")
            .iter()
            .filter_map(|e| e["path"].as_str().map(String::from))
            .collect()
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        content_type,
        body,
    }
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, request).await
}
