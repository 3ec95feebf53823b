//! Movie entity model.

use casting_core::types::{Date, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A movie row from the `movies` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub release_date: Date,
}
