#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use casting_core::roles::Role;
use casting_db::{CastingStore, MemoryStore};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use tower::ServiceExt;

use casting_api::auth::jwt::{AuthConfig, TokenVerifier};
use casting_api::config::{ServerConfig, StoreBackend};
use casting_api::router::build_app_router;
use casting_api::state::AppState;

/// Shared HS256 secret the test verifier accepts.
pub const TEST_SECRET: &str = "casting-test-secret";

/// Build a test `ServerConfig`: shared-secret auth, no identity provider.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8100".to_string()],
        request_timeout_secs: 30,
        store: StoreBackend::Memory,
        auth: AuthConfig {
            domain: None,
            audience: None,
            client_id: None,
            callback_url: None,
            secret: Some(TEST_SECRET.to_string()),
            jwks_cache_ttl_secs: 600,
        },
    }
}

/// Build the full application router over `store`, with the same middleware
/// stack production uses.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    build_app_with_config(store, test_config())
}

pub fn build_app_with_config(store: Arc<MemoryStore>, config: ServerConfig) -> Router {
    let verifier = TokenVerifier::from_config(&config.auth);
    let store: Arc<dyn CastingStore> = store;
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        verifier: Arc::new(verifier),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Sign arbitrary claims with the test secret.
pub fn sign(claims: serde_json::Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("signing test token")
}

/// A valid token carrying exactly `permissions`.
pub fn token_with(permissions: &[&str]) -> String {
    sign(json!({
        "sub": "auth0|test-user",
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    }))
}

/// A valid token carrying the permissions of `role`.
pub fn token_for(role: Role) -> String {
    let permissions: Vec<&str> = role.permissions().iter().map(|p| p.as_str()).collect();
    token_with(&permissions)
}

/// A token that expired an hour ago, well past the default leeway.
pub fn expired_token(role: Role) -> String {
    let permissions: Vec<&str> = role.permissions().iter().map(|p| p.as_str()).collect();
    sign(json!({
        "sub": "auth0|test-user",
        "iat": now() - 7200,
        "exp": now() - 3600,
        "permissions": permissions,
    }))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send a request with an optional bearer token and optional JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Send a request with a bearer token and a raw (not necessarily JSON) body.
pub async fn send_raw(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    body: impl Into<Body>,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a request with a raw `Authorization` header value.
pub async fn send_with_header(app: Router, method: Method, uri: &str, header: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, header)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
