use std::sync::Arc;

use casting_db::CastingStore;

use crate::auth::jwt::TokenVerifier;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Storage handle. Every write it performs is its own transaction.
    pub store: Arc<dyn CastingStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Bearer-token verifier, including the process-wide signing-key cache.
    pub verifier: Arc<TokenVerifier>,
}
