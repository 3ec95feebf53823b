//! Handlers for the actor resource.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use casting_core::error::CoreError;
use casting_core::payload::{self, CreatePayload, EntityKind};
use casting_core::types::DbId;
use casting_db::models::actor::Actor;
use casting_db::models::Entity;

use super::EntityId;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{
    RequireDeleteActors, RequireGetActors, RequirePatchActors, RequirePostActors,
};
use crate::response::DeletedResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: EntityKind::Actor.name(),
        id,
    })
}

/// GET /actors
pub async fn list(
    _: RequireGetActors,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Actor>>> {
    let actors = state.store.list_actors().await?;
    Ok(Json(actors))
}

/// GET /actor/{id}
pub async fn get_by_id(
    _: RequireGetActors,
    EntityId(id): EntityId,
    State(state): State<AppState>,
) -> AppResult<Json<Actor>> {
    let actor = state
        .store
        .find_actor(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(actor))
}

/// POST /actor
///
/// Echoes the validated fields rather than the stored row.
pub async fn create(
    RequirePostActors(user): RequirePostActors,
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<CreatePayload>> {
    let input = payload::decode_create(EntityKind::Actor, &body?)?;
    let actor = state.store.create(&input).await?;

    tracing::info!(actor_id = actor.id(), subject = %user.subject, "Actor created");
    Ok(Json(input))
}

/// PATCH /actor/{id}
pub async fn update(
    RequirePatchActors(user): RequirePatchActors,
    EntityId(id): EntityId,
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<Entity>> {
    let patch = payload::decode_patch(EntityKind::Actor, &body?)?;
    let actor = state
        .store
        .update(id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(actor_id = id, subject = %user.subject, "Actor updated");
    Ok(Json(actor))
}

/// DELETE /actor/{id}
pub async fn delete(
    RequireDeleteActors(user): RequireDeleteActors,
    EntityId(id): EntityId,
    State(state): State<AppState>,
) -> AppResult<Json<DeletedResponse>> {
    if !state.store.delete_actor(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(actor_id = id, subject = %user.subject, "Actor deleted");
    Ok(Json(DeletedResponse { deleted: id }))
}
