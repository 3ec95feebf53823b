//! Process-wide cache of the identity provider's signing keys.
//!
//! The JWKS document is fetched lazily and kept for a configurable TTL. A
//! stale cache or an unknown `kid` (key rotation) triggers a refresh, but at
//! most one refresh per [`MIN_REFRESH_INTERVAL`] so a flood of tokens with
//! made-up key ids cannot hammer the provider. Refreshes happen under the
//! write lock, so concurrent requests wait for a single fetch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use tokio::sync::RwLock;

use super::jwt::VerifyError;

/// Minimum spacing between two fetch attempts.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Timeout for one JWKS fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct CacheState {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<Instant>,
    last_attempt: Option<Instant>,
}

impl CacheState {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.is_some_and(|at| at.elapsed() < ttl)
    }

    fn may_fetch(&self) -> bool {
        self.last_attempt
            .map_or(true, |at| at.elapsed() >= MIN_REFRESH_INTERVAL)
    }

    /// A usable answer without fetching, if there is one. `refreshable` is
    /// false for key sets that have no source to fetch from.
    fn lookup(
        &self,
        kid: &str,
        ttl: Duration,
        refreshable: bool,
    ) -> Option<Result<Option<DecodingKey>, VerifyError>> {
        let key = self.keys.get(kid).cloned();
        if self.is_fresh(ttl) && key.is_some() {
            return Some(Ok(key));
        }
        if refreshable && self.may_fetch() {
            return None;
        }
        if refreshable && self.keys.is_empty() {
            return Some(Err(VerifyError::KeysUnavailable(
                "no signing keys cached; waiting before the next fetch".into(),
            )));
        }
        Some(Ok(key))
    }
}

pub struct JwksCache {
    /// JWKS document URL; `None` for a preloaded, never-refreshed key set.
    url: Option<String>,
    client: reqwest::Client,
    ttl: Duration,
    state: RwLock<CacheState>,
}

impl JwksCache {
    pub fn new(url: String, ttl: Duration) -> Self {
        Self {
            url: Some(url),
            client: reqwest::Client::new(),
            ttl,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// A cache holding a fixed key set that is never refreshed.
    pub fn preloaded(set: &JwkSet) -> Self {
        let now = Instant::now();
        Self {
            url: None,
            client: reqwest::Client::new(),
            ttl: Duration::MAX,
            state: RwLock::new(CacheState {
                keys: decoding_keys(set),
                fetched_at: Some(now),
                last_attempt: Some(now),
            }),
        }
    }

    /// Look up the decoding key for `kid`, refreshing the key set if needed.
    ///
    /// Returns `Ok(None)` when the provider does not publish `kid`. Fails only
    /// when no keys at all could be obtained.
    pub async fn key(&self, kid: &str) -> Result<Option<DecodingKey>, VerifyError> {
        let refreshable = self.url.is_some();

        let cached = self.state.read().await.lookup(kid, self.ttl, refreshable);
        if let Some(answer) = cached {
            return answer;
        }

        let mut state = self.state.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(answer) = state.lookup(kid, self.ttl, refreshable) {
            return answer;
        }

        let Some(url) = self.url.as_deref() else {
            return Ok(state.keys.get(kid).cloned());
        };

        state.last_attempt = Some(Instant::now());
        match self.fetch(url).await {
            Ok(keys) => {
                tracing::info!(url, key_count = keys.len(), "Refreshed signing keys");
                state.keys = keys;
                state.fetched_at = Some(Instant::now());
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "Failed to fetch signing keys");
                if state.keys.is_empty() {
                    return Err(VerifyError::KeysUnavailable(e.to_string()));
                }
            }
        }

        Ok(state.keys.get(kid).cloned())
    }

    async fn fetch(&self, url: &str) -> Result<HashMap<String, DecodingKey>, reqwest::Error> {
        let set: JwkSet = self
            .client
            .get(url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(decoding_keys(&set))
    }
}

/// Index the usable keys of `set` by key id. Keys without an id or of an
/// unsupported type are skipped.
fn decoding_keys(set: &JwkSet) -> HashMap<String, DecodingKey> {
    set.keys
        .iter()
        .filter_map(|jwk| {
            let kid = jwk.common.key_id.clone()?;
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => Some((kid, key)),
                Err(e) => {
                    tracing::warn!(kid = %kid, error = %e, "Skipping unusable signing key");
                    None
                }
            }
        })
        .collect()
}
