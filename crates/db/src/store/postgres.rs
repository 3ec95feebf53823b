//! Postgres-backed [`CastingStore`].
//!
//! Each write opens its own transaction with `pool.begin()`. An error at any
//! step returns early and drops the `Transaction`, which rolls it back; only
//! the final `commit()` makes changes visible.

use async_trait::async_trait;
use casting_core::error::StorageError;
use casting_core::payload::{ActorFields, ActorPatch, MovieFields, MoviePatch};
use casting_core::types::DbId;

use super::CastingStore;
use crate::models::actor::Actor;
use crate::models::movie::Movie;
use crate::repositories::{ActorRepo, MovieRepo};
use crate::{classify_sqlx_error, DbPool};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CastingStore for PgStore {
    async fn health_check(&self) -> Result<(), StorageError> {
        crate::health_check(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn create_movie(&self, input: &MovieFields) -> Result<Movie, StorageError> {
        let mut tx = self.pool.begin().await.map_err(classify_sqlx_error)?;
        let movie = MovieRepo::create(&mut *tx, input)
            .await
            .map_err(classify_sqlx_error)?;
        tx.commit().await.map_err(classify_sqlx_error)?;
        Ok(movie)
    }

    async fn find_movie(&self, id: DbId) -> Result<Option<Movie>, StorageError> {
        MovieRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StorageError> {
        MovieRepo::list(&self.pool).await.map_err(classify_sqlx_error)
    }

    async fn update_movie(
        &self,
        id: DbId,
        input: &MoviePatch,
    ) -> Result<Option<Movie>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(classify_sqlx_error)?;
        let movie = MovieRepo::update(&mut *tx, id, input)
            .await
            .map_err(classify_sqlx_error)?;
        tx.commit().await.map_err(classify_sqlx_error)?;
        Ok(movie)
    }

    async fn delete_movie(&self, id: DbId) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await.map_err(classify_sqlx_error)?;
        let deleted = MovieRepo::delete(&mut *tx, id)
            .await
            .map_err(classify_sqlx_error)?;
        tx.commit().await.map_err(classify_sqlx_error)?;
        Ok(deleted)
    }

    async fn create_actor(&self, input: &ActorFields) -> Result<Actor, StorageError> {
        let mut tx = self.pool.begin().await.map_err(classify_sqlx_error)?;
        let actor = ActorRepo::create(&mut *tx, input)
            .await
            .map_err(classify_sqlx_error)?;
        tx.commit().await.map_err(classify_sqlx_error)?;
        Ok(actor)
    }

    async fn find_actor(&self, id: DbId) -> Result<Option<Actor>, StorageError> {
        ActorRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn list_actors(&self) -> Result<Vec<Actor>, StorageError> {
        ActorRepo::list(&self.pool).await.map_err(classify_sqlx_error)
    }

    async fn update_actor(
        &self,
        id: DbId,
        input: &ActorPatch,
    ) -> Result<Option<Actor>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(classify_sqlx_error)?;
        let actor = ActorRepo::update(&mut *tx, id, input)
            .await
            .map_err(classify_sqlx_error)?;
        tx.commit().await.map_err(classify_sqlx_error)?;
        Ok(actor)
    }

    async fn delete_actor(&self, id: DbId) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await.map_err(classify_sqlx_error)?;
        let deleted = ActorRepo::delete(&mut *tx, id)
            .await
            .map_err(classify_sqlx_error)?;
        tx.commit().await.map_err(classify_sqlx_error)?;
        Ok(deleted)
    }
}
