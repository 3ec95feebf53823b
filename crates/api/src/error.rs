use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use casting_core::error::{AuthError, CoreError, StorageError};
use serde_json::json;

use crate::auth::jwt::VerifyError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `casting_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No route or resource matches the request path.
    #[error("Route not found")]
    RouteNotFound,

    /// The path exists but does not accept the request method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The request body could not be read.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeds the size limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    RequestTimeout,

    /// The identity provider's signing keys could not be obtained.
    #[error("Identity provider unavailable: {0}")]
    IdentityProvider(String),

    /// An internal error with a human-readable message (e.g. a caught panic).
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Core(CoreError::Auth(err))
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Core(CoreError::Storage(err))
    }
}

impl From<VerifyError> for AppError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Auth(auth) => auth.into(),
            VerifyError::KeysUnavailable(msg) => AppError::IdentityProvider(msg),
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "UNPROCESSABLE_ENTITY",
                    msg.clone(),
                ),
                CoreError::Auth(auth) => classify_auth_error(auth),
                CoreError::Storage(storage) => classify_storage_error(storage),
            },

            // --- HTTP-specific errors ---
            AppError::RouteNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            ),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                "Method not allowed".to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "Request body is too large".to_string(),
            ),
            AppError::RequestTimeout => (
                StatusCode::REQUEST_TIMEOUT,
                "REQUEST_TIMEOUT",
                "Request timed out".to_string(),
            ),
            AppError::IdentityProvider(msg) => {
                tracing::error!(error = %msg, "Identity provider unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "IDENTITY_PROVIDER_UNAVAILABLE",
                    "Unable to verify credentials at this time".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// A caller lacking a permission is identified but forbidden (403); every
/// other auth failure means the caller is not identified (401).
fn classify_auth_error(err: &AuthError) -> (StatusCode, &'static str, String) {
    tracing::debug!(error = %err, "Request rejected by auth");
    let status = match err {
        AuthError::InsufficientScope { .. } => StatusCode::FORBIDDEN,
        _ => StatusCode::UNAUTHORIZED,
    };
    (status, err.code(), err.to_string())
}

/// Classify a storage failure into an HTTP status, error code, and message.
///
/// - `WriteFailed` maps to 422: the write was rejected as given.
/// - `Unavailable` maps to 503: the backend could not be reached.
///
/// Backend messages are logged, never returned.
fn classify_storage_error(err: &StorageError) -> (StatusCode, &'static str, String) {
    match err {
        StorageError::WriteFailed(msg) => {
            tracing::warn!(error = %msg, "Storage write failed, transaction rolled back");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                "The request could not be processed".to_string(),
            )
        }
        StorageError::Unavailable(msg) => {
            tracing::error!(error = %msg, "Storage unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_UNAVAILABLE",
                "Service temporarily unavailable".to_string(),
            )
        }
    }
}
