//! Request handlers.
//!
//! Every protected handler follows the same sequence: the permission extractor
//! (token verification, then the permission gate), the path id, the payload
//! validator for write bodies, one store call, and finally the JSON outcome.

pub mod actor;
pub mod info;
pub mod movie;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use casting_core::types::DbId;

use crate::error::AppError;

/// The `{id}` path segment of an entity route.
///
/// A segment that is not an integer cannot name an entity, so it is reported
/// as a JSON 404 like any other unknown resource.
pub struct EntityId(pub DbId);

impl<S: Send + Sync> FromRequestParts<S> for EntityId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<DbId>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::RouteNotFound)?;
        Ok(EntityId(id))
    }
}
