//! Bearer-token verification.
//!
//! Tokens are issued by the identity provider. In production they are RS256
//! JWTs whose signing key is looked up by `kid` in the provider's JWKS
//! document (see [`super::jwks`]). For local development and tests a shared
//! HS256 secret can be configured instead.
//!
//! Verification is a function of the token, the current time and the signing
//! keys; the only state it touches is the process-wide key cache.

use casting_core::error::AuthError;
use casting_core::permissions::PermissionSet;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::jwks::JwksCache;

/// JWT claims consumed by the API.
///
/// `iss` and `aud` are checked by [`Validation`] straight from the raw
/// payload, so they are not part of this struct.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the identity provider's user id (e.g. `auth0|65f1...`).
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Resolved permissions of the user's roles (RBAC "add permissions in the
    /// access token" setting of the provider).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

/// Identity-provider settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Provider tenant domain, e.g. `casting.eu.auth0.com`. Enables JWKS mode.
    pub domain: Option<String>,
    /// API identifier expected in the `aud` claim.
    pub audience: Option<String>,
    /// Client id used to build the login URL.
    pub client_id: Option<String>,
    /// Redirect target after login.
    pub callback_url: Option<String>,
    /// Shared HS256 secret, used when no domain is configured.
    pub secret: Option<String>,
    /// How long a fetched JWKS document is trusted, in seconds.
    pub jwks_cache_ttl_secs: u64,
}

/// Default JWKS cache lifetime in seconds.
const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 600;

impl AuthConfig {
    /// Load identity-provider configuration from environment variables.
    ///
    /// | Env Var               | Required                         | Default |
    /// |-----------------------|----------------------------------|---------|
    /// | `AUTH0_DOMAIN`        | one of `AUTH0_DOMAIN`/`JWT_SECRET` | --    |
    /// | `API_AUDIENCE`        | with `AUTH0_DOMAIN`              | --      |
    /// | `CLIENT_ID`           | no                               | --      |
    /// | `CALLBACK_URL`        | no                               | --      |
    /// | `JWT_SECRET`          | one of `AUTH0_DOMAIN`/`JWT_SECRET` | --    |
    /// | `JWKS_CACHE_TTL_SECS` | no                               | `600`   |
    ///
    /// # Panics
    ///
    /// Panics if neither `AUTH0_DOMAIN` nor `JWT_SECRET` is set, or if
    /// `AUTH0_DOMAIN` is set without `API_AUDIENCE`.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let domain = var("AUTH0_DOMAIN");
        let audience = var("API_AUDIENCE");
        let secret = var("JWT_SECRET");

        assert!(
            domain.is_some() || secret.is_some(),
            "either AUTH0_DOMAIN or JWT_SECRET must be set in the environment"
        );
        assert!(
            domain.is_none() || audience.is_some(),
            "API_AUDIENCE must be set when AUTH0_DOMAIN is set"
        );

        let jwks_cache_ttl_secs: u64 = std::env::var("JWKS_CACHE_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_JWKS_CACHE_TTL_SECS.to_string())
            .parse()
            .expect("JWKS_CACHE_TTL_SECS must be a valid u64");

        Self {
            domain,
            audience,
            client_id: var("CLIENT_ID"),
            callback_url: var("CALLBACK_URL"),
            secret,
            jwks_cache_ttl_secs,
        }
    }

    /// Issuer the provider writes into `iss`.
    pub fn issuer(&self) -> Option<String> {
        self.domain.as_ref().map(|d| format!("https://{d}/"))
    }

    /// Location of the provider's published signing keys.
    pub fn jwks_url(&self) -> Option<String> {
        self.domain
            .as_ref()
            .map(|d| format!("https://{d}/.well-known/jwks.json"))
    }

    /// Implicit-flow authorize URL a client visits to obtain a token.
    ///
    /// `None` when the provider is not configured.
    pub fn login_url(&self) -> Option<String> {
        let domain = self.domain.as_deref()?;
        Some(format!(
            "https://{domain}/authorize?audience={}&response_type=token&client_id={}&redirect_uri={}",
            self.audience.as_deref().unwrap_or_default(),
            self.client_id.as_deref().unwrap_or_default(),
            self.callback_url.as_deref().unwrap_or_default(),
        ))
    }
}

/// Outcome of a successful verification.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub subject: String,
    pub permissions: PermissionSet,
}

/// Verification failure.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The token itself is at fault.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// No signing keys could be obtained from the provider.
    #[error("signing keys unavailable: {0}")]
    KeysUnavailable(String),
}

enum KeySource {
    Secret(DecodingKey),
    Jwks(JwksCache),
}

/// Verifies bearer tokens and extracts their permission set.
pub struct TokenVerifier {
    keys: KeySource,
    validation: Validation,
}

impl TokenVerifier {
    /// Verifier for HS256 tokens signed with a shared secret. `aud` is checked
    /// only when `audience` is given.
    pub fn with_secret(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        Self {
            keys: KeySource::Secret(DecodingKey::from_secret(secret.as_bytes())),
            validation,
        }
    }

    /// Verifier for RS256 tokens whose keys come from `cache`.
    pub fn with_jwks(cache: JwksCache, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        Self {
            keys: KeySource::Jwks(cache),
            validation,
        }
    }

    /// Build the verifier selected by `config`: JWKS mode when a provider
    /// domain is configured, shared-secret mode otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `config` configures neither mode (see [`AuthConfig::from_env`]).
    pub fn from_config(config: &AuthConfig) -> Self {
        match (config.jwks_url(), config.issuer(), config.audience.as_deref()) {
            (Some(url), Some(issuer), Some(audience)) => {
                let cache = JwksCache::new(
                    url,
                    std::time::Duration::from_secs(config.jwks_cache_ttl_secs),
                );
                Self::with_jwks(cache, &issuer, audience)
            }
            _ => {
                let secret = config
                    .secret
                    .as_deref()
                    .expect("JWT_SECRET is required when no identity provider domain is set");
                Self::with_secret(secret, config.audience.as_deref())
            }
        }
    }

    /// Verify `token` and return its subject and permission set.
    pub async fn verify(&self, token: &str) -> Result<VerifiedToken, VerifyError> {
        let header = decode_header(token).map_err(map_jwt_error)?;

        let key = match &self.keys {
            KeySource::Secret(key) => key.clone(),
            KeySource::Jwks(cache) => {
                let kid = header.kid.ok_or_else(|| {
                    AuthError::MalformedToken("token header has no key id".into())
                })?;
                cache.key(&kid).await?.ok_or_else(|| {
                    AuthError::InvalidToken("unable to find the appropriate key".into())
                })?
            }
        };

        let data = decode::<Claims>(token, &key, &self.validation).map_err(map_jwt_error)?;
        let claims = data.claims;

        let permissions = claims.permissions.ok_or_else(|| {
            AuthError::MalformedToken("permissions not included in token".into())
        })?;

        Ok(VerifiedToken {
            subject: claims.sub,
            permissions: PermissionSet::from_claims(permissions),
        })
    }
}

/// Map a `jsonwebtoken` failure onto the auth taxonomy.
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::MissingAlgorithm
        | ErrorKind::InvalidAlgorithmName => AuthError::MalformedToken(err.to_string()),
        _ => AuthError::InvalidToken(err.to_string()),
    }
}
