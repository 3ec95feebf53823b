//! Persistence layer: row models, Postgres repositories, and the
//! [`CastingStore`] abstraction handed to the API as an explicit handle.

use casting_core::error::StorageError;
use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::memory::MemoryStore;
pub use store::postgres::PgStore;
pub use store::CastingStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Classify a sqlx error into the storage taxonomy.
///
/// - Connection-level failures (I/O, TLS, closed pool, protocol, crashed
///   worker, SQLSTATE classes `08`, `53`, `57P`) are [`StorageError::Unavailable`].
/// - Everything else, including constraint and data violations, statement
///   timeouts and pool acquire timeouts, is [`StorageError::WriteFailed`].
pub fn classify_sqlx_error(err: sqlx::Error) -> StorageError {
    match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolClosed
        | sqlx::Error::Protocol(_)
        | sqlx::Error::WorkerCrashed => {
            tracing::error!(error = %err, "Storage backend unavailable");
            StorageError::Unavailable(err.to_string())
        }
        sqlx::Error::Database(db_err) => {
            let code = db_err.code();
            let code = code.as_deref().unwrap_or_default();
            if code.starts_with("08") || code.starts_with("53") || code.starts_with("57P") {
                tracing::error!(error = %db_err, code, "Storage backend unavailable");
                StorageError::Unavailable(db_err.message().to_string())
            } else {
                tracing::warn!(
                    error = %db_err,
                    code,
                    constraint = db_err.constraint().unwrap_or(""),
                    "Storage write rejected"
                );
                StorageError::WriteFailed(db_err.message().to_string())
            }
        }
        _ => {
            tracing::warn!(error = %err, "Storage write failed");
            StorageError::WriteFailed(err.to_string())
        }
    }
}
