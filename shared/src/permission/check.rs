//! Matrix evaluation shared by the server middleware and the client mirror

use serde_json::Value;

use super::matrix::{Permission, PermissionMatrix};

/// What a route demands of the caller's role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// A single module/action
    One(Permission),
    /// At least one of the listed permissions
    Any(Vec<Permission>),
    /// Every listed permission
    All(Vec<Permission>),
}

impl Requirement {
    /// Body field echoed back to the client on denial
    pub fn diagnostic(&self) -> (&'static str, Value) {
        match self {
            Requirement::One(p) => ("requiredPermission", serde_json::json!(p)),
            Requirement::Any(list) | Requirement::All(list) => {
                ("requiredPermissions", serde_json::json!(list))
            }
        }
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |list: &[Permission], sep: &str| {
            list.iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(sep)
        };
        match self {
            Requirement::One(p) => write!(f, "{p}"),
            Requirement::Any(list) => write!(f, "any({})", join(list, " | ")),
            Requirement::All(list) => write!(f, "all({})", join(list, " & ")),
        }
    }
}

/// Why the matrix refused a requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The module has no entry in the role's matrix
    ModuleMissing(Permission),
    /// The module exists but the action is not `true`
    ActionNotGranted(Permission),
    /// An any/all requirement was not met
    Insufficient(Vec<Permission>),
}

impl Denial {
    pub fn message(&self) -> String {
        match self {
            Denial::ModuleMissing(p) => format!(
                "Access denied. You don't have permission to access {}",
                p.module
            ),
            Denial::ActionNotGranted(p) => format!(
                "Access denied. You don't have permission to {} {}",
                p.action, p.module
            ),
            Denial::Insufficient(_) => "Insufficient permissions".to_string(),
        }
    }
}

/// Superadmin bypass, then strict matrix lookup.
///
/// `Any([])` denies and `All([])` grants.
pub fn evaluate(
    is_super_admin: bool,
    matrix: &PermissionMatrix,
    requirement: &Requirement,
) -> Result<(), Denial> {
    if is_super_admin {
        return Ok(());
    }

    match requirement {
        Requirement::One(p) => {
            if !matrix.has_module(p.module) {
                Err(Denial::ModuleMissing(*p))
            } else if !matrix.allows_permission(p) {
                Err(Denial::ActionNotGranted(*p))
            } else {
                Ok(())
            }
        }
        Requirement::Any(list) => {
            if list.iter().any(|p| matrix.allows_permission(p)) {
                Ok(())
            } else {
                Err(Denial::Insufficient(list.clone()))
            }
        }
        Requirement::All(list) => {
            if list.iter().all(|p| matrix.allows_permission(p)) {
                Ok(())
            } else {
                Err(Denial::Insufficient(list.clone()))
            }
        }
    }
}
