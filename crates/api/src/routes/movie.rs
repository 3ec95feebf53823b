//! Route definitions for movies.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::movie;
use crate::state::AppState;

/// Movie routes.
///
/// ```text
/// GET    /movies            -> list          get:movies
/// GET    /movie/{id}        -> get_by_id     get:movies
/// POST   /movie             -> create        post:movies
/// PATCH  /movie/{id}        -> update        patch:movies
/// DELETE /movie/{id}        -> delete        delete:movies
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(movie::list))
        .route("/movie", post(movie::create))
        .route(
            "/movie/{id}",
            get(movie::get_by_id)
                .patch(movie::update)
                .delete(movie::delete),
        )
}
