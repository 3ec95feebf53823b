//! Domain building blocks for the casting agency API.
//!
//! - [`error`] -- error taxonomy shared by every layer.
//! - [`permissions`] -- the permission vocabulary and per-request permission sets.
//! - [`roles`] -- the role -> permission table managed by the identity provider.
//! - [`payload`] -- schema-checked decoding of request bodies.

pub mod error;
pub mod payload;
pub mod permissions;
pub mod roles;
pub mod types;
