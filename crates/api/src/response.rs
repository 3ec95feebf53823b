//! Shared response bodies for API handlers.

use casting_core::types::DbId;
use serde::Serialize;

/// Body returned by a successful delete.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: DbId,
}
