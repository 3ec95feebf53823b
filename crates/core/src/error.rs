use crate::permissions::Permission;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures of the credential verifier and the permission gate.
///
/// Everything except [`AuthError::InsufficientScope`] means the caller could
/// not be identified (401); `InsufficientScope` means the caller was
/// identified but lacks the permission (403).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is expected")]
    MissingToken,

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Permission '{required}' not found in token")]
    InsufficientScope { required: Permission },
}

impl AuthError {
    /// Stable machine-readable code returned in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::MalformedToken(_) => "MALFORMED_TOKEN",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::ExpiredToken => "EXPIRED_TOKEN",
            AuthError::InsufficientScope { .. } => "INSUFFICIENT_SCOPE",
        }
    }
}

/// Failures of a storage operation. The transaction has already been rolled
/// back by the time one of these is observed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The write was rejected or timed out (constraint or data violation,
    /// statement or pool timeout).
    #[error("Storage write failed: {0}")]
    WriteFailed(String),

    /// The backend could not be reached at all.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
