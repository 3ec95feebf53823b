//! Storage abstraction injected into request handling.
//!
//! Every mutating method is one scoped transaction: it either commits all of
//! its changes or none of them, and the rollback happens before the method
//! returns its error.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use casting_core::error::StorageError;
use casting_core::payload::{
    ActorFields, ActorPatch, CreatePayload, MovieFields, MoviePatch, PatchPayload,
};
use casting_core::types::DbId;

use crate::models::actor::Actor;
use crate::models::movie::Movie;
use crate::models::Entity;

/// Durable storage for movies and actors.
///
/// Lookups that miss return `None` (or `false` for deletes); callers turn that
/// into a not-found error.
#[async_trait]
pub trait CastingStore: Send + Sync {
    /// Confirm the backend is reachable.
    async fn health_check(&self) -> Result<(), StorageError>;

    async fn create_movie(&self, input: &MovieFields) -> Result<Movie, StorageError>;
    async fn find_movie(&self, id: DbId) -> Result<Option<Movie>, StorageError>;
    async fn list_movies(&self) -> Result<Vec<Movie>, StorageError>;
    async fn update_movie(&self, id: DbId, input: &MoviePatch)
        -> Result<Option<Movie>, StorageError>;
    async fn delete_movie(&self, id: DbId) -> Result<bool, StorageError>;

    async fn create_actor(&self, input: &ActorFields) -> Result<Actor, StorageError>;
    async fn find_actor(&self, id: DbId) -> Result<Option<Actor>, StorageError>;
    async fn list_actors(&self) -> Result<Vec<Actor>, StorageError>;
    async fn update_actor(&self, id: DbId, input: &ActorPatch)
        -> Result<Option<Actor>, StorageError>;
    async fn delete_actor(&self, id: DbId) -> Result<bool, StorageError>;

    /// Create whichever entity `payload` describes.
    async fn create(&self, payload: &CreatePayload) -> Result<Entity, StorageError> {
        match payload {
            CreatePayload::Movie(fields) => self.create_movie(fields).await.map(Entity::Movie),
            CreatePayload::Actor(fields) => self.create_actor(fields).await.map(Entity::Actor),
        }
    }

    /// Apply `patch` to the entity of its kind with `id`.
    async fn update(&self, id: DbId, patch: &PatchPayload) -> Result<Option<Entity>, StorageError> {
        match patch {
            PatchPayload::Movie(patch) => Ok(self.update_movie(id, patch).await?.map(Entity::Movie)),
            PatchPayload::Actor(patch) => Ok(self.update_actor(id, patch).await?.map(Entity::Actor)),
        }
    }
}
