//! Role -> permission table.
//!
//! Roles are assigned and resolved by the identity provider; request handling
//! only ever sees the resulting permission list. This table mirrors the
//! provider's configuration so the hierarchy can be checked in tests and used
//! to mint tokens for local development.

use crate::permissions::{Permission, PermissionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Can view movies and actors.
    CastingAssistant,
    /// Everything an assistant can do, plus add, delete and modify movies and actors.
    CastingDirector,
}

const CASTING_ASSISTANT: &[Permission] = &[Permission::GetMovies, Permission::GetActors];

const CASTING_DIRECTOR: &[Permission] = &[
    Permission::GetMovies,
    Permission::GetActors,
    Permission::PostMovies,
    Permission::PostActors,
    Permission::DeleteMovies,
    Permission::DeleteActors,
    Permission::PatchMovies,
    Permission::PatchActors,
];

impl Role {
    pub const ALL: [Role; 2] = [Role::CastingAssistant, Role::CastingDirector];

    /// Display name as configured in the identity provider.
    pub const fn name(self) -> &'static str {
        match self {
            Role::CastingAssistant => "Casting Assistant",
            Role::CastingDirector => "Casting Director",
        }
    }

    pub const fn permissions(self) -> &'static [Permission] {
        match self {
            Role::CastingAssistant => CASTING_ASSISTANT,
            Role::CastingDirector => CASTING_DIRECTOR,
        }
    }

    pub fn permission_set(self) -> PermissionSet {
        self.permissions().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_is_subset_of_director() {
        let assistant = Role::CastingAssistant.permission_set();
        let director = Role::CastingDirector.permission_set();
        assert!(assistant.is_subset(&director));
        assert!(!director.is_subset(&assistant));
    }

    #[test]
    fn assistant_can_only_read() {
        let set = Role::CastingAssistant.permission_set();
        assert!(set.contains(Permission::GetMovies));
        assert!(set.contains(Permission::GetActors));
        assert!(set.iter().all(|p| p.as_str().starts_with("get:")));
    }

    #[test]
    fn director_holds_whole_vocabulary() {
        let set = Role::CastingDirector.permission_set();
        assert_eq!(set.len(), Permission::ALL.len());
    }

    #[test]
    fn role_tables_have_no_duplicates() {
        for role in Role::ALL {
            assert_eq!(role.permission_set().len(), role.permissions().len(), "{}", role.name());
        }
    }
}
