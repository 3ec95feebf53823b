use std::net::SocketAddr;
use std::sync::Arc;

use casting_db::{CastingStore, MemoryStore, PgStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use casting_api::auth::jwt::TokenVerifier;
use casting_api::config::{ServerConfig, StoreBackend};
use casting_api::router::build_app_router;
use casting_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "casting_api=debug,casting_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let store = connect_store(&config.store).await;

    // --- Token verification ---
    let verifier = TokenVerifier::from_config(&config.auth);
    match config.auth.domain.as_deref() {
        Some(domain) => tracing::info!(domain, "Verifying RS256 tokens against provider JWKS"),
        None => tracing::warn!("No identity provider configured, verifying HS256 shared-secret tokens"),
    }

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        verifier: Arc::new(verifier),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Open the configured store, applying migrations for Postgres.
async fn connect_store(backend: &StoreBackend) -> Arc<dyn CastingStore> {
    let database_url = match backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on shutdown");
            return Arc::new(MemoryStore::new());
        }
        StoreBackend::Postgres(url) => url,
    };

    let pool = casting_db::create_pool(database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    casting_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    casting_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    Arc::new(PgStore::new(pool))
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
