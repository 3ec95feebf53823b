//! Actor entity model.

use casting_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// An actor row from the `actors` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Actor {
    pub id: DbId,
    pub name: String,
    pub age: i32,
    pub gender: String,
}
