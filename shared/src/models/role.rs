//! Role Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::permission::PermissionMatrix;

/// Role entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_super_admin: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub permissions: PermissionMatrix,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

/// Role with the number of admins assigned to it (list view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleWithCount {
    #[serde(flatten)]
    pub role: Role,
    pub admin_count: u64,
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoleCreate {
    #[validate(length(min = 2, max = 50, message = "Role name must be 2-50 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: String,
    #[serde(default)]
    pub is_super_admin: bool,
    pub is_active: Option<bool>,
    /// Omitted: the default skeleton (everything denied)
    pub permissions: Option<PermissionMatrix>,
}

/// Update role payload
///
/// `permissions`, when present, replaces the whole matrix.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdate {
    #[validate(length(min = 2, max = 50, message = "Role name must be 2-50 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    pub is_super_admin: Option<bool>,
    pub is_active: Option<bool>,
    pub permissions: Option<PermissionMatrix>,
}
