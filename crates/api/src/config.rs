//! Process configuration read once at startup.
//!
//! Misconfiguration panics with the name of the offending variable; the
//! server should not start half-configured.

use std::str::FromStr;

use crate::auth::jwt::AuthConfig;

/// `DATABASE_URL` value that selects the in-process store.
pub const MEMORY_DATABASE_URL: &str = "memory://";

/// Where persistent state lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// `DATABASE_URL=memory://`; data is lost on shutdown.
    Memory,
    /// Any other `DATABASE_URL`, passed to the Postgres pool as is.
    Postgres(String),
}

impl StoreBackend {
    pub fn from_url(url: &str) -> Self {
        if url == MEMORY_DATABASE_URL {
            StoreBackend::Memory
        } else {
            StoreBackend::Postgres(url.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS.
    pub cors_origins: Vec<String>,
    /// Upper bound on one request, in seconds; exceeding it yields 408.
    pub request_timeout_secs: u64,
    pub store: StoreBackend,
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Read the server configuration from the environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:8100`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`         | required                   |
    ///
    /// Identity-provider variables are described on [`AuthConfig::from_env`].
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins: split_origins(&env_or(
                "CORS_ORIGINS",
                "http://localhost:8100".to_string(),
            )),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            store: StoreBackend::from_url(&database_url),
            auth: AuthConfig::from_env(),
        }
    }
}

/// Parse `name` from the environment, falling back to `default` when unset.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value {raw:?}: {e}")),
        Err(_) => default,
    }
}

/// Comma-separated origin list; blanks are dropped.
fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
