//! Admin Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Role;
use crate::permission::PermissionMatrix;

/// UI theme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

/// Dashboard density preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardLayout {
    #[default]
    Default,
    Compact,
    Detailed,
}

/// Per-admin UI preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default)]
    pub dashboard_layout: DashboardLayout,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            email_notifications: true,
            dashboard_layout: DashboardLayout::default(),
            language: default_language(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "en".to_string()
}

/// Admin entity (the password hash never leaves the storage layer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub last_login: Option<i64>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Admin {
    /// Uploaded avatar, or a generated initials avatar
    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(path) if !path.is_empty() => path.clone(),
            _ => format!(
                "https://ui-avatars.com/api/?name={}&background=667eea&color=fff&size=256",
                encode_uri_component(&self.name)
            ),
        }
    }

    pub fn summary(&self) -> AdminSummary {
        AdminSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Role summary embedded in admin responses, source of the client mirror
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDetails {
    pub id: String,
    pub name: String,
    pub is_super_admin: bool,
    pub permissions: PermissionMatrix,
}

impl From<&Role> for RoleDetails {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.clone(),
            name: role.name.clone(),
            is_super_admin: role.is_super_admin,
            permissions: role.permissions.clone(),
        }
    }
}

/// Admin as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminView {
    #[serde(flatten)]
    pub admin: Admin,
    pub avatar_url: String,
    /// Role name, or `"No Role"`
    pub display_role: String,
    pub role_details: Option<RoleDetails>,
}

impl AdminView {
    pub fn new(admin: Admin, role: Option<&Role>) -> Self {
        Self {
            avatar_url: admin.avatar_url(),
            display_role: role
                .map(|r| r.name.clone())
                .unwrap_or_else(|| "No Role".to_string()),
            role_details: role.map(RoleDetails::from),
            admin,
        }
    }
}

/// `{id, name, email}` reference used when populating other records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Create admin payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreate {
    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role_id: String,
    pub is_active: Option<bool>,
    #[validate(length(max = 30, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "Department is too long"))]
    pub department: Option<String>,
    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<String>,
}

/// Update admin payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdate {
    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
    pub role_id: Option<String>,
    pub is_active: Option<bool>,
    #[validate(length(max = 30, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "Department is too long"))]
    pub department: Option<String>,
    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<String>,
}
