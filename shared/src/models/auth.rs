//! Auth and profile request/response types

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{AdminView, DashboardLayout, Preferences, Theme};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Omitted: the active default role
    pub role_id: Option<String>,
}

/// Returned by login and register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub admin: AdminView,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
    #[validate(length(max = 30, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 100, message = "Department is too long"))]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, max = 128, message = "New password must be at least 6 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub theme: Option<Theme>,
    pub email_notifications: Option<bool>,
    pub dashboard_layout: Option<DashboardLayout>,
    #[validate(length(min = 2, max = 10, message = "Invalid language"))]
    pub language: Option<String>,
}

impl Preferences {
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(enabled) = update.email_notifications {
            self.email_notifications = enabled;
        }
        if let Some(layout) = update.dashboard_layout {
            self.dashboard_layout = layout;
        }
        if let Some(language) = update.language {
            self.language = language;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_confirmation_must_match() {
        let change = PasswordChange {
            current_password: "old-secret".into(),
            new_password: "new-secret".into(),
            confirm_password: "other".into(),
        };
        let err = change.validate().unwrap_err();
        assert!(err.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn test_register_requires_valid_email() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Jo",
            "email": "not-an-email",
            "password": "secret1"
        }))
        .unwrap();
        assert!(req.validate().is_err());
        assert!(req.role_id.is_none());
    }

    #[test]
    fn test_preferences_apply_partial() {
        let mut prefs = Preferences::default();
        prefs.apply(PreferencesUpdate {
            theme: Some(Theme::Dark),
            ..Default::default()
        });
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.email_notifications);
    }
}
