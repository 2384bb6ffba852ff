/// Integration tests for `POST /api/users`
///
/// These drive the full router (extractors, validation, store, hashing,
/// token signing, error rendering) against an in-memory store.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{
    app_with, app_with_store, post_json, send, test_config, FailOn, FailingStore, TestContext,
    TEST_SECRET,
};
use connector_shared::{
    auth::{jwt::validate_token, password::verify_password},
    avatar::{gravatar_url, AvatarOptions},
    store::{InMemoryUserStore, UserStore},
};
use serde_json::json;
use std::sync::Arc;

fn ada() -> serde_json::Value {
    json!({ "name": "Ada", "email": "ada@example.com", "password": "secret1" })
}

#[tokio::test]
async fn test_register_creates_user_and_returns_token() {
    let ctx = TestContext::new();

    let response = ctx.post_users(ada()).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());

    let token = response.json()["token"]
        .as_str()
        .expect("token string")
        .to_string();
    let claims = validate_token(&token, TEST_SECRET).expect("token should validate");

    let user = ctx
        .store
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .expect("user should be persisted");

    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.exp - claims.iat, 360_000);
    assert_eq!(user.name, "Ada");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(ctx.store.len().await, 1);
}

#[tokio::test]
async fn test_register_hashes_password() {
    let ctx = TestContext::new();
    ctx.post_users(ada()).await;

    let user = ctx.store.find_by_email("ada@example.com").await.unwrap().unwrap();

    assert_ne!(user.password_hash, "secret1");
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert!(verify_password("secret1", &user.password_hash).unwrap());
}

#[tokio::test]
async fn test_register_derives_gravatar_avatar() {
    let ctx = TestContext::new();
    ctx.post_users(ada()).await;

    let user = ctx.store.find_by_email("ada@example.com").await.unwrap().unwrap();

    assert_eq!(user.avatar, gravatar_url("ada@example.com", &AvatarOptions::default()));
    assert!(user.avatar.ends_with("?s=200&r=pg&d=mm"));
}

#[tokio::test]
async fn test_empty_body_reports_every_field() {
    let ctx = TestContext::new();

    let response = ctx.post_users(json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_paths(), vec!["name", "email", "password"]);
    assert_eq!(
        response.error_messages(),
        vec![
            "Name is required",
            "Please include a valid email address",
            "Please enter a password with at least 6 characters",
        ]
    );

    for entry in response.json()["errors"].as_array().unwrap() {
        assert_eq!(entry["type"], "field");
        assert_eq!(entry["location"], "body");
    }
    assert!(ctx.store.is_empty().await);
}

#[tokio::test]
async fn test_null_fields_are_validation_errors() {
    let ctx = TestContext::new();

    let response = ctx
        .post_users(json!({ "name": null, "email": null, "password": null }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_paths(), vec!["name", "email", "password"]);
}

#[tokio::test]
async fn test_short_password_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .post_users(json!({ "name": "Ada", "email": "ada@example.com", "password": "12345" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_paths(), vec!["password"]);
    assert!(ctx.store.is_empty().await);
}

#[tokio::test]
async fn test_malformed_email_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .post_users(json!({ "name": "Ada", "email": "not-an-email", "password": "secret1" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_paths(), vec!["email"]);
    assert_eq!(
        response.error_messages(),
        vec!["Please include a valid email address"]
    );
}

#[tokio::test]
async fn test_empty_name_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .post_users(json!({ "name": "", "email": "ada@example.com", "password": "secret1" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_messages(), vec!["Name is required"]);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let ctx = TestContext::new();
    assert_eq!(ctx.post_users(ada()).await.status, StatusCode::CREATED);

    let response = ctx
        .post_users(json!({ "name": "Someone Else", "email": "ada@example.com", "password": "different-password" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({ "errors": [{ "msg": "User already exists" }] }));
    assert_eq!(ctx.store.len().await, 1);
}

#[tokio::test]
async fn test_duplicate_check_ignores_email_case() {
    let ctx = TestContext::new();
    ctx.post_users(ada()).await;

    let response = ctx
        .post_users(json!({ "name": "Ada", "email": "ADA@Example.com", "password": "secret1" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_messages(), vec!["User already exists"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_registrations_admit_exactly_one() {
    let ctx = TestContext::new();

    let (first, second) = tokio::join!(ctx.post_users(ada()), ctx.post_users(ada()));

    let mut statuses = vec![first.status.as_u16(), second.status.as_u16()];
    statuses.sort();
    assert_eq!(statuses, vec![201, 400]);

    let loser = if first.status == StatusCode::BAD_REQUEST { first } else { second };
    assert_eq!(loser.error_messages(), vec!["User already exists"]);
    assert_eq!(ctx.store.len().await, 1);
}

#[tokio::test]
async fn test_lookup_failure_returns_server_error() {
    let app = app_with_store(Arc::new(FailingStore {
        fail_on: FailOn::Lookup,
    }));

    let response = post_json(&app, "/api/users", ada()).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Server error");
    assert!(response
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn test_insert_failure_returns_server_error() {
    let app = app_with_store(Arc::new(FailingStore {
        fail_on: FailOn::Create,
    }));

    let response = post_json(&app, "/api/users", ada()).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Server error");
}

#[tokio::test]
async fn test_unrepresentable_token_lifetime_returns_server_error() {
    let mut config = test_config();
    config.jwt.expiration_seconds = 10_000_000_000_000;
    let app = app_with(Arc::new(InMemoryUserStore::new()), config);

    let response = post_json(&app, "/api/users", ada()).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Server error");
}

#[tokio::test]
async fn test_validation_runs_before_store_is_touched() {
    // A broken store must not turn a bad request into a server error
    let app = app_with_store(Arc::new(FailingStore {
        fail_on: FailOn::Lookup,
    }));

    let response = post_json(&app, "/api/users", json!({ "email": "ada@example.com" })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_paths(), vec!["name", "password"]);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = send(&ctx.app, request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_messages().len(), 1);
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .body(Body::from(ada().to_string()))
        .unwrap();
    let response = send(&ctx.app, request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_messages().len(), 1);
    assert!(ctx.store.is_empty().await);
}

#[tokio::test]
async fn test_wrong_field_type_is_bad_request() {
    let ctx = TestContext::new();

    let response = ctx
        .post_users(json!({ "name": 42, "email": "ada@example.com", "password": "secret1" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_messages().len(), 1);
}
