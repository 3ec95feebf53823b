pub mod actor;
pub mod health;
pub mod movie;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the resource route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                       login info (public)
///
/// /movies                 list
/// /movie                  create
/// /movie/{id}             get, update, delete
///
/// /actors                 list
/// /actor                  create
/// /actor/{id}             get, update, delete
/// ```
///
/// Every route except `/` requires a bearer token carrying the matching
/// `<verb>:<resource>` permission.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::info::index))
        .merge(movie::router())
        .merge(actor::router())
}
