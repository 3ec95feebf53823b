//! Handlers for the movie resource.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use casting_core::error::CoreError;
use casting_core::payload::{self, CreatePayload, EntityKind};
use casting_core::types::DbId;
use casting_db::models::movie::Movie;
use casting_db::models::Entity;

use super::EntityId;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{
    RequireDeleteMovies, RequireGetMovies, RequirePatchMovies, RequirePostMovies,
};
use crate::response::DeletedResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: EntityKind::Movie.name(),
        id,
    })
}

/// GET /movies
pub async fn list(
    _: RequireGetMovies,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.store.list_movies().await?;
    Ok(Json(movies))
}

/// GET /movie/{id}
pub async fn get_by_id(
    _: RequireGetMovies,
    EntityId(id): EntityId,
    State(state): State<AppState>,
) -> AppResult<Json<Movie>> {
    let movie = state
        .store
        .find_movie(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(movie))
}

/// POST /movie
///
/// Echoes the validated fields rather than the stored row.
pub async fn create(
    RequirePostMovies(user): RequirePostMovies,
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<CreatePayload>> {
    let input = payload::decode_create(EntityKind::Movie, &body?)?;
    let movie = state.store.create(&input).await?;

    tracing::info!(movie_id = movie.id(), subject = %user.subject, "Movie created");
    Ok(Json(input))
}

/// PATCH /movie/{id}
pub async fn update(
    RequirePatchMovies(user): RequirePatchMovies,
    EntityId(id): EntityId,
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<Entity>> {
    let patch = payload::decode_patch(EntityKind::Movie, &body?)?;
    let movie = state
        .store
        .update(id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(movie_id = id, subject = %user.subject, "Movie updated");
    Ok(Json(movie))
}

/// DELETE /movie/{id}
pub async fn delete(
    RequireDeleteMovies(user): RequireDeleteMovies,
    EntityId(id): EntityId,
    State(state): State<AppState>,
) -> AppResult<Json<DeletedResponse>> {
    if !state.store.delete_movie(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(movie_id = id, subject = %user.subject, "Movie deleted");
    Ok(Json(DeletedResponse { deleted: id }))
}
