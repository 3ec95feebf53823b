//! HTTP-level integration tests for the movie endpoints.
//!
//! Requests go through the full router via `tower::ServiceExt`, backed by an
//! in-memory store and HS256 tokens.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use casting_core::error::StorageError;
use casting_core::roles::Role;
use casting_db::{CastingStore, MemoryStore};
use common::{
    body_json, delete, expired_token, get, patch_json, post_json, send, send_with_header,
    token_for, token_with,
};
use serde_json::json;

fn inception() -> serde_json::Value {
    json!({"title": "Inception 2", "release_date": "2024-04-04"})
}

/// Create a movie through the API and return its id.
async fn seed_movie(store: &Arc<MemoryStore>, title: &str) -> i64 {
    let app = common::build_test_app(store.clone());
    let director = token_for(Role::CastingDirector);
    let response = post_json(
        app,
        "/movie",
        &director,
        json!({"title": title, "release_date": "2010-07-16"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let movies = store.list_movies().await.unwrap();
    movies.iter().find(|m| m.title == title).unwrap().id
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn director_creates_movie_and_gets_echo() {
    let store = Arc::new(MemoryStore::new());
    let app = common::build_test_app(store.clone());

    let response = post_json(app, "/movie", &token_for(Role::CastingDirector), inception()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, inception());

    let movies = store.list_movies().await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Inception 2");
}

#[tokio::test]
async fn assistant_cannot_create_movie() {
    let store = Arc::new(MemoryStore::new());
    let app = common::build_test_app(store.clone());

    let response = post_json(app, "/movie", &token_for(Role::CastingAssistant), inception()).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_SCOPE");
    assert!(store.list_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn misspelled_field_is_unprocessable() {
    let store = Arc::new(MemoryStore::new());
    let app = common::build_test_app(store.clone());

    let response = post_json(
        app,
        "/movie",
        &token_for(Role::CastingDirector),
        json!({"titles": "Inception 2", "release_date": "2024-04-04"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "UNPROCESSABLE_ENTITY");
    assert!(store.list_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn bad_date_and_non_object_bodies_are_unprocessable() {
    let store = Arc::new(MemoryStore::new());
    let director = token_for(Role::CastingDirector);

    for body in [
        json!({"title": "Heat", "release_date": "16/07/2010"}),
        json!({"title": "", "release_date": "2010-07-16"}),
        json!(["Heat", "2010-07-16"]),
    ] {
        let app = common::build_test_app(store.clone());
        let response = post_json(app, "/movie", &director, body).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
    assert!(store.list_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_canonical_release_dates_are_rejected_not_rewritten() {
    let store = Arc::new(MemoryStore::new());
    let director = token_for(Role::CastingDirector);

    for raw in ["2024-4-4", "+2024-04-04"] {
        let app = common::build_test_app(store.clone());
        let response = post_json(
            app,
            "/movie",
            &director,
            json!({"title": "Inception 2", "release_date": raw}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "date {raw:?}");
        assert_eq!(body_json(response).await["code"], "UNPROCESSABLE_ENTITY");
    }
    assert!(store.list_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn patch_with_non_canonical_date_is_unprocessable() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_movie(&store, "Heat").await;
    let app = common::build_test_app(store.clone());

    let response = patch_json(
        app,
        &format!("/movie/{id}"),
        &token_for(Role::CastingDirector),
        json!({"release_date": "2011-7-16"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let movie = store.find_movie(id).await.unwrap().unwrap();
    assert_eq!(movie.release_date.to_string(), "2010-07-16");
}

#[tokio::test]
async fn permission_is_checked_before_body() {
    let store = Arc::new(MemoryStore::new());
    let app = common::build_test_app(store);

    let response = post_json(
        app,
        "/movie",
        &token_for(Role::CastingAssistant),
        json!({"titles": 42}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_body_never_reaches_storage() {
    let store = Arc::new(MemoryStore::new());
    store
        .inject_fault(StorageError::Unavailable("connection refused".into()))
        .await;
    let app = common::build_test_app(store);

    let response = post_json(
        app,
        "/movie",
        &token_for(Role::CastingDirector),
        json!({"title": "Heat"}),
    )
    .await;

    // A storage round-trip would have surfaced the injected 503.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Storage failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_write_rolls_back_and_returns_422() {
    let store = Arc::new(MemoryStore::new());
    store
        .inject_fault(StorageError::WriteFailed("constraint violated".into()))
        .await;
    let app = common::build_test_app(store.clone());

    let response = post_json(app, "/movie", &token_for(Role::CastingDirector), inception()).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNPROCESSABLE_ENTITY");
    assert!(!json["error"].as_str().unwrap().contains("constraint"));
    assert!(store.list_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_storage_returns_503() {
    let store = Arc::new(MemoryStore::new());
    store
        .inject_fault(StorageError::Unavailable("connection refused".into()))
        .await;
    let app = common::build_test_app(store.clone());

    let response = post_json(app, "/movie", &token_for(Role::CastingDirector), inception()).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "STORAGE_UNAVAILABLE");
    assert!(store.list_movies().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn assistant_lists_and_reads_movies() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_movie(&store, "Heat").await;
    let assistant = token_for(Role::CastingAssistant);

    let app = common::build_test_app(store.clone());
    let response = get(app, "/movies", Some(&assistant)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let app = common::build_test_app(store);
    let response = get(app, &format!("/movie/{id}"), Some(&assistant)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], id);
    assert_eq!(json["title"], "Heat");
    assert_eq!(json["release_date"], "2010-07-16");
}

#[tokio::test]
async fn unknown_movie_returns_404() {
    let store = Arc::new(MemoryStore::new());
    let app = common::build_test_app(store);

    let response = get(app, "/movie/9999", Some(&token_for(Role::CastingAssistant))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Movie with id 9999 not found");
}

#[tokio::test]
async fn non_numeric_id_returns_json_404() {
    let store = Arc::new(MemoryStore::new());
    let app = common::build_test_app(store);

    let response = get(app, "/movie/abc", Some(&token_for(Role::CastingAssistant))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn director_patches_single_field() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_movie(&store, "Heat").await;
    let app = common::build_test_app(store.clone());

    let response = patch_json(
        app,
        &format!("/movie/{id}"),
        &token_for(Role::CastingDirector),
        json!({"title": "Heat 2"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Heat 2");
    assert_eq!(json["release_date"], "2010-07-16");
}

#[tokio::test]
async fn empty_patch_is_unprocessable() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_movie(&store, "Heat").await;
    let app = common::build_test_app(store);

    let response = patch_json(
        app,
        &format!("/movie/{id}"),
        &token_for(Role::CastingDirector),
        json!({"rating": 5}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn patch_of_missing_movie_returns_404() {
    let store = Arc::new(MemoryStore::new());
    let app = common::build_test_app(store);

    let response = patch_json(
        app,
        "/movie/9999",
        &token_for(Role::CastingDirector),
        json!({"title": "Heat 2"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_requires_patch_permission() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_movie(&store, "Heat").await;
    let app = common::build_test_app(store);

    let token = token_with(&["get:movies", "post:movies"]);
    let response = patch_json(app, &format!("/movie/{id}"), &token, json!({"title": "X"})).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_twice_returns_200_then_404() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_movie(&store, "Heat").await;
    let director = token_for(Role::CastingDirector);

    let app = common::build_test_app(store.clone());
    let response = delete(app, &format!("/movie/{id}"), &director).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"deleted": id}));

    let app = common::build_test_app(store.clone());
    let response = delete(app, &format!("/movie/{id}"), &director).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(store.list_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_unknown_movie_returns_404() {
    let store = Arc::new(MemoryStore::new());
    let app = common::build_test_app(store);

    let response = delete(app, "/movie/9999", &token_for(Role::CastingDirector)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Token failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_returns_401() {
    let store = Arc::new(MemoryStore::new());
    let app = common::build_test_app(store);

    let response = send(app, Method::GET, "/movies", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "MISSING_TOKEN");
}

#[tokio::test]
async fn malformed_headers_return_401() {
    let store = Arc::new(MemoryStore::new());

    for header in ["Token abc", "Bearer", "Bearer a b", "Bearer not-a-jwt"] {
        let app = common::build_test_app(store.clone());
        let response = send_with_header(app, Method::GET, "/movies", header).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "header {header:?}");
        assert_eq!(body_json(response).await["code"], "MALFORMED_TOKEN");
    }
}

#[tokio::test]
async fn expired_token_returns_401() {
    let store = Arc::new(MemoryStore::new());
    let app = common::build_test_app(store.clone());

    let response = post_json(
        app,
        "/movie",
        &expired_token(Role::CastingDirector),
        inception(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "EXPIRED_TOKEN");
    assert!(store.list_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn token_without_permissions_claim_returns_401() {
    let store = Arc::new(MemoryStore::new());
    let app = common::build_test_app(store);

    let token = common::sign(json!({
        "sub": "auth0|test-user",
        "exp": chrono::Utc::now().timestamp() + 3600,
    }));
    let response = get(app, "/movies", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "MALFORMED_TOKEN");
}

#[tokio::test]
async fn token_signed_with_other_secret_returns_401() {
    let store = Arc::new(MemoryStore::new());
    let app = common::build_test_app(store);

    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({
            "sub": "auth0|intruder",
            "exp": chrono::Utc::now().timestamp() + 3600,
            "permissions": ["get:movies"],
        }),
        &jsonwebtoken::EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();
    let response = get(app, "/movies", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "INVALID_TOKEN");
}
