//! Row models.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching the
//! database row. Create and update inputs are the validated field structs from
//! [`casting_core::payload`].

pub mod actor;
pub mod movie;

use casting_core::types::DbId;
use serde::Serialize;

use self::actor::Actor;
use self::movie::Movie;

/// A stored row of either kind. Serializes as the bare row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Movie(Movie),
    Actor(Actor),
}

impl Entity {
    pub fn id(&self) -> DbId {
        match self {
            Entity::Movie(movie) => movie.id,
            Entity::Actor(actor) => actor.id,
        }
    }
}
