//! Public, unauthenticated endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct LoginInfo {
    pub message: &'static str,
    /// Authorize URL at the identity provider; `null` in shared-secret mode.
    pub url: Option<String>,
}

/// GET / -- tells clients where to obtain a token.
pub async fn index(State(state): State<AppState>) -> Json<LoginInfo> {
    Json(LoginInfo {
        message: "Please login to this URL",
        url: state.config.auth.login_url(),
    })
}

/// Fallback for paths no route matches.
pub async fn not_found() -> AppError {
    AppError::RouteNotFound
}

/// Fallback for a known path requested with a method it does not serve.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
