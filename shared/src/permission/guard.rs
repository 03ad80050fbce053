//! Client-held mirror of the caller's permissions
//!
//! Used to show or hide UI affordances. The server re-checks every request,
//! so nothing here is a security boundary.

use super::check::{Requirement, evaluate};
use super::matrix::{Action, Module, Permission, PermissionMatrix};
use crate::models::RoleDetails;

#[derive(Debug, Clone, PartialEq, Eq)]
struct LoadedRole {
    is_super_admin: bool,
    permissions: PermissionMatrix,
}

/// Permission mirror loaded from `login` / `me` responses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionGuard {
    loaded: Option<LoadedRole>,
}

impl PermissionGuard {
    /// Guard with nothing loaded; every check is false
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `roleDetails` of an admin profile.
    ///
    /// An admin without role details still counts as loaded, with an
    /// empty matrix.
    pub fn from_role(details: Option<&RoleDetails>) -> Self {
        let mut guard = Self::new();
        guard.load(details);
        guard
    }

    pub fn load(&mut self, details: Option<&RoleDetails>) {
        self.loaded = Some(match details {
            Some(d) => LoadedRole {
                is_super_admin: d.is_super_admin,
                permissions: d.permissions.clone(),
            },
            None => LoadedRole {
                is_super_admin: false,
                permissions: PermissionMatrix::new(),
            },
        });
    }

    /// Forget everything (logout)
    pub fn clear(&mut self) {
        self.loaded = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    fn check(&self, requirement: Requirement) -> bool {
        self.loaded
            .as_ref()
            .is_some_and(|r| evaluate(r.is_super_admin, &r.permissions, &requirement).is_ok())
    }

    pub fn has_permission(&self, module: Module, action: Action) -> bool {
        self.check(Requirement::One(Permission::new(module, action)))
    }

    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        self.check(Requirement::Any(permissions.to_vec()))
    }

    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        self.check(Requirement::All(permissions.to_vec()))
    }

    pub fn is_super_admin(&self) -> bool {
        self.loaded.as_ref().is_some_and(|r| r.is_super_admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(is_super_admin: bool, permissions: PermissionMatrix) -> RoleDetails {
        RoleDetails {
            id: "r1".into(),
            name: "Support".into(),
            is_super_admin,
            permissions,
        }
    }

    #[test]
    fn test_nothing_loaded_denies_everything() {
        let guard = PermissionGuard::new();
        assert!(!guard.has_permission(Module::Dashboard, Action::View));
        assert!(!guard.has_all_permissions(&[]));
        assert!(!guard.is_super_admin());
    }

    #[test]
    fn test_super_admin_bypass() {
        let guard = PermissionGuard::from_role(Some(&details(true, PermissionMatrix::new())));
        assert!(guard.is_super_admin());
        assert!(guard.has_permission(Module::DataModels, Action::Delete));
        assert!(guard.has_any_permission(&[]));
    }

    #[test]
    fn test_matrix_lookup() {
        let matrix = PermissionMatrix::new()
            .with(Module::Orders, Action::View, true)
            .with(Module::Orders, Action::Edit, false);
        let guard = PermissionGuard::from_role(Some(&details(false, matrix)));

        let orders_view = Permission::new(Module::Orders, Action::View);
        let orders_edit = Permission::new(Module::Orders, Action::Edit);

        assert!(guard.has_permission(Module::Orders, Action::View));
        assert!(!guard.has_permission(Module::Orders, Action::Edit));
        assert!(guard.has_any_permission(&[orders_view, orders_edit]));
        assert!(!guard.has_all_permissions(&[orders_view, orders_edit]));
    }

    #[test]
    fn test_missing_role_details_is_empty_matrix() {
        let mut guard = PermissionGuard::from_role(None);
        assert!(guard.is_loaded());
        assert!(!guard.has_permission(Module::Dashboard, Action::View));

        guard.clear();
        assert!(!guard.is_loaded());
    }
}
