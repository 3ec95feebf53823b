//! Permission vocabulary and per-request permission sets.
//!
//! A permission grants one action on one entity kind and is written
//! `<action>:<collection>` on the wire (e.g. `delete:actors`). The identity
//! provider places the resolved list in the token's `permissions` claim.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::AuthError;

/// One entry of the fixed permission vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    GetMovies,
    GetActors,
    PostMovies,
    PostActors,
    DeleteMovies,
    DeleteActors,
    PatchMovies,
    PatchActors,
}

impl Permission {
    /// Every permission in the vocabulary.
    pub const ALL: [Permission; 8] = [
        Permission::GetMovies,
        Permission::GetActors,
        Permission::PostMovies,
        Permission::PostActors,
        Permission::DeleteMovies,
        Permission::DeleteActors,
        Permission::PatchMovies,
        Permission::PatchActors,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Permission::GetMovies => "get:movies",
            Permission::GetActors => "get:actors",
            Permission::PostMovies => "post:movies",
            Permission::PostActors => "post:actors",
            Permission::DeleteMovies => "delete:movies",
            Permission::DeleteActors => "delete:actors",
            Permission::PatchMovies => "patch:movies",
            Permission::PatchActors => "patch:actors",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not part of the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The permissions attached to one verified token.
///
/// Built once per request from the token claims and dropped with the request;
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Build a set from raw claim strings. Strings outside the vocabulary are
    /// skipped: they grant nothing here.
    pub fn from_claims<I, S>(claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            claims
                .into_iter()
                .filter_map(|s| s.as_ref().parse().ok())
                .collect(),
        )
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// Permission gate: succeeds only if `permission` is in the set.
    pub fn require(&self, permission: Permission) -> Result<(), AuthError> {
        if self.contains(permission) {
            Ok(())
        } else {
            Err(AuthError::InsufficientScope {
                required: permission,
            })
        }
    }

    pub fn is_subset(&self, other: &PermissionSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
