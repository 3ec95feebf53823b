//! Credential verification.
//!
//! - [`jwt`] -- bearer-token verification and identity-provider configuration.
//! - [`jwks`] -- process-wide cache of the provider's published signing keys.

pub mod jwks;
pub mod jwt;
