//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Verifies the bearer token and extracts its permission set.
//! - [`rbac`] -- One extractor per permission (`RequirePostMovies`, ...) that
//!   rejects the request unless the verified set holds that permission.

pub mod auth;
pub mod rbac;
