//! In-process [`CastingStore`] used by tests and `DATABASE_URL=memory://`.
//!
//! A write clones the tables, applies the change to the copy, checks the same
//! constraints as the SQL schema, and swaps the copy in only if everything
//! succeeded. A failed write therefore leaves no trace, including the id
//! sequences.

use std::collections::BTreeMap;

use async_trait::async_trait;
use casting_core::error::StorageError;
use casting_core::payload::{ActorFields, ActorPatch, MovieFields, MoviePatch};
use casting_core::types::DbId;
use tokio::sync::Mutex;

use super::CastingStore;
use crate::models::actor::Actor;
use crate::models::movie::Movie;

#[derive(Debug, Clone, Default)]
struct Tables {
    movies: BTreeMap<DbId, Movie>,
    actors: BTreeMap<DbId, Actor>,
    movie_seq: DbId,
    actor_seq: DbId,
}

#[derive(Debug, Default)]
struct Inner {
    tables: Tables,
    /// Failure to raise at commit time of the next write.
    fault: Option<StorageError>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next write fail with `err` after its changes were applied to
    /// the staged copy, exercising the rollback path.
    pub async fn inject_fault(&self, err: StorageError) {
        self.inner.lock().await.fault = Some(err);
    }

    /// Run `apply` against a staged copy of the tables and commit on success.
    async fn write<T, F>(&self, apply: F) -> Result<T, StorageError>
    where
        T: Send,
        F: FnOnce(&mut Tables) -> Result<T, StorageError> + Send,
    {
        let mut inner = self.inner.lock().await;
        let mut staged = inner.tables.clone();

        let outcome = apply(&mut staged).and_then(|value| match inner.fault.take() {
            Some(err) => Err(err),
            None => Ok(value),
        });

        match outcome {
            Ok(value) => {
                inner.tables = staged;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(error = %err, "Rolled back in-memory transaction");
                Err(err)
            }
        }
    }
}

fn check_movie(movie: &Movie) -> Result<(), StorageError> {
    if movie.title.trim().is_empty() {
        return Err(StorageError::WriteFailed(
            "violates check constraint \"ck_movies_title_not_blank\"".into(),
        ));
    }
    Ok(())
}

fn check_actor(actor: &Actor) -> Result<(), StorageError> {
    if actor.name.trim().is_empty() {
        return Err(StorageError::WriteFailed(
            "violates check constraint \"ck_actors_name_not_blank\"".into(),
        ));
    }
    if actor.age < 0 {
        return Err(StorageError::WriteFailed(
            "violates check constraint \"ck_actors_age_non_negative\"".into(),
        ));
    }
    Ok(())
}

#[async_trait]
impl CastingStore for MemoryStore {
    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn create_movie(&self, input: &MovieFields) -> Result<Movie, StorageError> {
        self.write(|tables| {
            tables.movie_seq += 1;
            let movie = Movie {
                id: tables.movie_seq,
                title: input.title.clone(),
                release_date: input.release_date,
            };
            check_movie(&movie)?;
            tables.movies.insert(movie.id, movie.clone());
            Ok(movie)
        })
        .await
    }

    async fn find_movie(&self, id: DbId) -> Result<Option<Movie>, StorageError> {
        Ok(self.inner.lock().await.tables.movies.get(&id).cloned())
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StorageError> {
        Ok(self.inner.lock().await.tables.movies.values().cloned().collect())
    }

    async fn update_movie(
        &self,
        id: DbId,
        input: &MoviePatch,
    ) -> Result<Option<Movie>, StorageError> {
        self.write(|tables| {
            let Some(movie) = tables.movies.get_mut(&id) else {
                return Ok(None);
            };
            if let Some(title) = &input.title {
                movie.title = title.clone();
            }
            if let Some(release_date) = input.release_date {
                movie.release_date = release_date;
            }
            check_movie(movie)?;
            Ok(Some(movie.clone()))
        })
        .await
    }

    async fn delete_movie(&self, id: DbId) -> Result<bool, StorageError> {
        self.write(|tables| Ok(tables.movies.remove(&id).is_some()))
            .await
    }

    async fn create_actor(&self, input: &ActorFields) -> Result<Actor, StorageError> {
        self.write(|tables| {
            tables.actor_seq += 1;
            let actor = Actor {
                id: tables.actor_seq,
                name: input.name.clone(),
                age: input.age,
                gender: input.gender.clone(),
            };
            check_actor(&actor)?;
            tables.actors.insert(actor.id, actor.clone());
            Ok(actor)
        })
        .await
    }

    async fn find_actor(&self, id: DbId) -> Result<Option<Actor>, StorageError> {
        Ok(self.inner.lock().await.tables.actors.get(&id).cloned())
    }

    async fn list_actors(&self) -> Result<Vec<Actor>, StorageError> {
        Ok(self.inner.lock().await.tables.actors.values().cloned().collect())
    }

    async fn update_actor(
        &self,
        id: DbId,
        input: &ActorPatch,
    ) -> Result<Option<Actor>, StorageError> {
        self.write(|tables| {
            let Some(actor) = tables.actors.get_mut(&id) else {
                return Ok(None);
            };
            if let Some(name) = &input.name {
                actor.name = name.clone();
            }
            if let Some(age) = input.age {
                actor.age = age;
            }
            if let Some(gender) = &input.gender {
                actor.gender = gender.clone();
            }
            check_actor(actor)?;
            Ok(Some(actor.clone()))
        })
        .await
    }

    async fn delete_actor(&self, id: DbId) -> Result<bool, StorageError> {
        self.write(|tables| Ok(tables.actors.remove(&id).is_some()))
            .await
    }
}
