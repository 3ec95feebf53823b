//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use casting_core::error::AuthError;
use casting_core::permissions::PermissionSet;

use crate::error::AppError;
use crate::state::AppState;

/// Caller identified by a verified bearer token in the `Authorization` header.
///
/// Handlers normally take one of the [`rbac`](super::rbac) extractors instead,
/// which wrap this one and also check a permission.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The identity provider's subject id (`sub` claim).
    pub subject: String,
    /// Permissions granted by the token, valid for this request only.
    pub permissions: PermissionSet,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?;

        let token = bearer_token(header)?;
        let verified = state.verifier.verify(token).await?;

        Ok(AuthUser {
            subject: verified.subject,
            permissions: verified.permissions,
        })
    }
}

/// Extract the token from a `Bearer <token>` header value. The scheme is
/// matched case-insensitively.
fn bearer_token(value: &HeaderValue) -> Result<&str, AuthError> {
    let value = value
        .to_str()
        .map_err(|_| AuthError::MalformedToken("Authorization header is not valid text".into()))?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        (Some(scheme), _, _) if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::MalformedToken("Authorization header must start with \"Bearer\"".into()),
        ),
        (_, None, _) => Err(AuthError::MalformedToken("Token not found".into())),
        _ => Err(AuthError::MalformedToken(
            "Authorization header must be bearer token".into(),
        )),
    }
}
