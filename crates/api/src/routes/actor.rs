//! Route definitions for actors.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::actor;
use crate::state::AppState;

/// Actor routes.
///
/// ```text
/// GET    /actors            -> list          get:actors
/// GET    /actor/{id}        -> get_by_id     get:actors
/// POST   /actor             -> create        post:actors
/// PATCH  /actor/{id}        -> update        patch:actors
/// DELETE /actor/{id}        -> delete        delete:actors
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/actors", get(actor::list))
        .route("/actor", post(actor::create))
        .route(
            "/actor/{id}",
            get(actor::get_by_id)
                .patch(actor::update)
                .delete(actor::delete),
        )
}
