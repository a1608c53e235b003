//! Common test utilities and helpers
//!
//! - `TestApp`: the full router over a temporary file store
//! - `ScriptedGenerator`: canned provider results for the generation client
//! - Auth helpers for registering users and opening sessions
//! - Assertion macros

#![allow(dead_code)]

pub mod assertions;
pub mod generator;

use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

use blogsmith::backend::auth::SessionKeys;
use blogsmith::backend::generation::{GenerationClient, ProviderError};
use blogsmith::backend::routes::create_router;
use blogsmith::backend::server::AppState;
use blogsmith::backend::storage::{FileStore, Stores};

pub use generator::{fast_policy, ok, quota, ScriptedGenerator};

pub const TEST_PASSWORD: &str = "password123";

/// A running router plus the pieces tests inspect
pub struct TestApp {
    pub server: TestServer,
    pub generator: Arc<ScriptedGenerator>,
    pub dir: TempDir,
}

async fn build(script: Option<Vec<Result<String, ProviderError>>>, expose_reset_tokens: bool) -> TestApp {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path().join("blog_data.json")).await.unwrap();

    let has_client = script.is_some();
    let generator = ScriptedGenerator::new(script.unwrap_or_default());
    let client =
        has_client.then(|| GenerationClient::with_generator(generator.clone(), fast_policy()));

    let state = AppState::new(
        Stores::from_shared(Arc::new(store)),
        client,
        SessionKeys::new("test-secret"),
    )
    .with_bcrypt_cost(4)
    .with_reset_token_exposure(expose_reset_tokens);

    let app = create_router(state, &["http://localhost:5173".to_string()]);

    TestApp {
        server: TestServer::new(app).unwrap(),
        generator,
        dir,
    }
}

/// App whose generation client replays `script`
pub async fn spawn_app(script: Vec<Result<String, ProviderError>>) -> TestApp {
    build(Some(script), false).await
}

/// App with no generation client configured
pub async fn spawn_app_without_generator() -> TestApp {
    build(None, false).await
}

/// App that returns reset tokens from forgot-password
pub async fn spawn_app_exposing_reset_tokens() -> TestApp {
    build(None, true).await
}

/// Request a reset token for `email` from an app exposing them
pub async fn reset_token(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": email }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["reset_token"].as_str().unwrap().to_string()
}

/// Register `email` and return `(token, user_id)`
pub async fn register(server: &TestServer, email: &str) -> (String, String) {
    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

/// Open an anonymous session and return its token
pub async fn anonymous(server: &TestServer) -> String {
    let response = server.post("/api/auth/anonymous").await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["token"].as_str().unwrap().to_string()
}

/// Create a post as the holder of `token`
pub async fn create_post(server: &TestServer, token: &str, body: Value) -> Value {
    let response = server
        .post("/api/posts")
        .authorization_bearer(token)
        .json(&body)
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}
