//! App Settings Model (singleton document)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use validator::Validate;

use crate::error::{AppError, ErrorCode};

pub const DEFAULT_APP_NAME: &str = "Admin Panel";
pub const DEFAULT_CONTACT_EMAIL: &str = "admin@example.com";
pub const DEFAULT_MAINTENANCE_MESSAGE: &str =
    "We are currently performing scheduled maintenance. Please check back soon.";

/// Fields readable through `GET /field/{name}` without authentication
pub const PUBLIC_FIELDS: &[&str] = &[
    "appName",
    "logoUrl",
    "faviconUrl",
    "maintenanceMode",
    "allowRegistration",
    "language",
    "timezone",
    "dateFormat",
];

/// Bookkeeping fields that are not settings themselves
const META_FIELDS: &[&str] = &["updatedBy", "updatedAt"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYear,
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYear,
    #[serde(rename = "YYYY-MM-DD")]
    Iso,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
}

/// Application-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[validate(length(min = 1, message = "App name cannot be empty"))]
    pub app_name: String,
    #[validate(url(message = "Invalid logo URL"))]
    pub logo_url: Option<String>,
    #[validate(url(message = "Invalid favicon URL"))]
    pub favicon_url: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub contact_email: String,
    #[validate(length(min = 5, max = 30, message = "Invalid phone number"))]
    pub support_phone: Option<String>,
    pub maintenance_mode: bool,
    pub maintenance_message: String,
    pub allow_registration: bool,
    #[validate(range(min = 3, max = 10, message = "Must be between 3-10"))]
    pub max_login_attempts: u32,
    #[validate(range(min = 5, max = 1440, message = "Must be between 5-1440 minutes"))]
    pub session_timeout: u32,
    pub date_format: DateFormat,
    pub timezone: String,
    pub language: Language,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub updated_at: i64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            logo_url: None,
            favicon_url: None,
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            support_phone: None,
            maintenance_mode: false,
            maintenance_message: DEFAULT_MAINTENANCE_MESSAGE.to_string(),
            allow_registration: true,
            max_login_attempts: 5,
            session_timeout: 30,
            date_format: DateFormat::default(),
            timezone: "UTC".to_string(),
            language: Language::default(),
            updated_by: None,
            updated_at: 0,
        }
    }
}

/// Partial update payload for `PUT /api/app-settings`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AppSettingsUpdate {
    #[validate(length(min = 1, message = "App name cannot be empty"))]
    pub app_name: Option<String>,
    #[validate(url(message = "Invalid logo URL"))]
    pub logo_url: Option<String>,
    #[validate(url(message = "Invalid favicon URL"))]
    pub favicon_url: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub contact_email: Option<String>,
    #[validate(length(min = 5, max = 30, message = "Invalid phone number"))]
    pub support_phone: Option<String>,
    pub maintenance_mode: Option<bool>,
    pub maintenance_message: Option<String>,
    pub allow_registration: Option<bool>,
    #[validate(range(min = 3, max = 10, message = "Must be between 3-10"))]
    pub max_login_attempts: Option<u32>,
    #[validate(range(min = 5, max = 1440, message = "Must be between 5-1440 minutes"))]
    pub session_timeout: Option<u32>,
    pub date_format: Option<DateFormat>,
    pub timezone: Option<String>,
    pub language: Option<Language>,
}

/// Errors of the single-field operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsFieldError {
    #[error("Setting field not found")]
    Unknown(String),
    #[error("This field requires authentication")]
    NotPublic(String),
    #[error("Field is not a boolean")]
    NotBoolean(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl From<SettingsFieldError> for AppError {
    fn from(err: SettingsFieldError) -> Self {
        let code = match &err {
            SettingsFieldError::Unknown(_) => ErrorCode::SettingFieldNotFound,
            SettingsFieldError::NotPublic(_) => ErrorCode::FieldRequiresAuth,
            SettingsFieldError::NotBoolean(_) => ErrorCode::SettingFieldNotBoolean,
            SettingsFieldError::InvalidValue(..) => ErrorCode::ValidationFailed,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Subset shown to anonymous callers of `GET /api/app-settings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSettings {
    pub app_name: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub maintenance_mode: bool,
    /// Only present while maintenance mode is on
    pub maintenance_message: Option<String>,
    pub allow_registration: bool,
    pub language: Language,
}

/// `GET /api/app-settings/public`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSettingsDetail {
    #[serde(flatten)]
    pub base: PublicSettings,
    pub contact_email: String,
    pub support_phone: Option<String>,
    pub timezone: String,
    pub date_format: DateFormat,
}

impl AppSettings {
    pub fn public_view(&self) -> PublicSettings {
        PublicSettings {
            app_name: self.app_name.clone(),
            logo_url: self.logo_url.clone(),
            favicon_url: self.favicon_url.clone(),
            maintenance_mode: self.maintenance_mode,
            maintenance_message: self
                .maintenance_mode
                .then(|| self.maintenance_message.clone()),
            allow_registration: self.allow_registration,
            language: self.language,
        }
    }

    pub fn public_detail(&self) -> PublicSettingsDetail {
        PublicSettingsDetail {
            base: self.public_view(),
            contact_email: self.contact_email.clone(),
            support_phone: self.support_phone.clone(),
            timezone: self.timezone.clone(),
            date_format: self.date_format,
        }
    }

    /// Restore defaults, keeping the bookkeeping fields
    pub fn reset(&mut self) {
        let updated_by = self.updated_by.take();
        let updated_at = self.updated_at;
        *self = Self {
            updated_by,
            updated_at,
            ..Self::default()
        };
    }

    /// Apply a partial update; returns `"field: old → new"` for every change
    pub fn apply(&mut self, update: AppSettingsUpdate) -> Vec<String> {
        let before = self.to_object();

        if let Some(v) = update.app_name {
            self.app_name = v.trim().to_string();
        }
        if update.logo_url.is_some() {
            self.logo_url = update.logo_url;
        }
        if update.favicon_url.is_some() {
            self.favicon_url = update.favicon_url;
        }
        if let Some(v) = update.contact_email {
            self.contact_email = v;
        }
        if update.support_phone.is_some() {
            self.support_phone = update.support_phone;
        }
        if let Some(v) = update.maintenance_mode {
            self.maintenance_mode = v;
        }
        if let Some(v) = update.maintenance_message {
            self.maintenance_message = v;
        }
        if let Some(v) = update.allow_registration {
            self.allow_registration = v;
        }
        if let Some(v) = update.max_login_attempts {
            self.max_login_attempts = v;
        }
        if let Some(v) = update.session_timeout {
            self.session_timeout = v;
        }
        if let Some(v) = update.date_format {
            self.date_format = v;
        }
        if let Some(v) = update.timezone {
            self.timezone = v;
        }
        if let Some(v) = update.language {
            self.language = v;
        }

        let after = self.to_object();
        after
            .iter()
            .filter(|(k, _)| !META_FIELDS.contains(&k.as_str()))
            .filter_map(|(k, new)| {
                let old = before.get(k).unwrap_or(&Value::Null);
                (old != new).then(|| format!("{k}: {} → {}", display(old), display(new)))
            })
            .collect()
    }

    /// Current value of a setting by its camelCase name
    pub fn field(&self, name: &str) -> Result<Value, SettingsFieldError> {
        if META_FIELDS.contains(&name) {
            return Err(SettingsFieldError::Unknown(name.to_string()));
        }
        self.to_object()
            .remove(name)
            .ok_or_else(|| SettingsFieldError::Unknown(name.to_string()))
    }

    /// Field lookup restricted to [`PUBLIC_FIELDS`]
    pub fn public_field(&self, name: &str) -> Result<Value, SettingsFieldError> {
        if !PUBLIC_FIELDS.contains(&name) {
            return Err(SettingsFieldError::NotPublic(name.to_string()));
        }
        self.field(name)
    }

    /// Replace one setting; returns the previous value.
    ///
    /// The new value must deserialize into the field's type and pass
    /// the same validation as a full update.
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<Value, SettingsFieldError> {
        let old = self.field(name)?;

        let mut object = self.to_object();
        object.insert(name.to_string(), value);
        let updated: AppSettings = serde_json::from_value(Value::Object(object))
            .map_err(|e| SettingsFieldError::InvalidValue(name.to_string(), e.to_string()))?;
        updated
            .validate()
            .map_err(|e| SettingsFieldError::InvalidValue(name.to_string(), AppError::from(e).message))?;

        *self = updated;
        Ok(old)
    }

    /// Flip a boolean setting; returns the new value
    pub fn toggle(&mut self, name: &str) -> Result<bool, SettingsFieldError> {
        let current = self
            .field(name)?
            .as_bool()
            .ok_or_else(|| SettingsFieldError::NotBoolean(name.to_string()))?;
        self.set_field(name, Value::Bool(!current))?;
        Ok(!current)
    }

    fn to_object(&self) -> serde_json::Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_view_hides_message_outside_maintenance() {
        let mut settings = AppSettings::default();
        assert_eq!(settings.public_view().maintenance_message, None);

        settings.maintenance_mode = true;
        assert_eq!(
            settings.public_view().maintenance_message.as_deref(),
            Some(DEFAULT_MAINTENANCE_MESSAGE)
        );
    }

    #[test]
    fn test_apply_reports_changes() {
        let mut settings = AppSettings::default();
        let changes = settings.apply(AppSettingsUpdate {
            app_name: Some("Console".into()),
            max_login_attempts: Some(5),
            ..Default::default()
        });
        assert_eq!(changes, vec!["appName: Admin Panel → Console".to_string()]);
    }

    #[test]
    fn test_update_validation() {
        let update = AppSettingsUpdate {
            session_timeout: Some(2),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(AppSettings::default().validate().is_ok());
    }

    #[test]
    fn test_field_access() {
        let settings = AppSettings::default();
        assert_eq!(settings.public_field("appName").unwrap(), "Admin Panel");
        assert_eq!(
            settings.public_field("contactEmail"),
            Err(SettingsFieldError::NotPublic("contactEmail".into()))
        );
        assert_eq!(
            settings.field("nope"),
            Err(SettingsFieldError::Unknown("nope".into()))
        );
        assert!(matches!(
            settings.field("updatedAt"),
            Err(SettingsFieldError::Unknown(_))
        ));
    }

    #[test]
    fn test_set_field_checks_type_and_range() {
        let mut settings = AppSettings::default();

        let old = settings.set_field("sessionTimeout", serde_json::json!(60)).unwrap();
        assert_eq!(old, 30);
        assert_eq!(settings.session_timeout, 60);

        assert!(matches!(
            settings.set_field("sessionTimeout", serde_json::json!("soon")),
            Err(SettingsFieldError::InvalidValue(..))
        ));
        assert!(matches!(
            settings.set_field("maxLoginAttempts", serde_json::json!(50)),
            Err(SettingsFieldError::InvalidValue(..))
        ));
        assert_eq!(settings.session_timeout, 60);
    }

    #[test]
    fn test_toggle() {
        let mut settings = AppSettings::default();
        assert_eq!(settings.toggle("maintenanceMode"), Ok(true));
        assert!(settings.maintenance_mode);
        assert_eq!(
            settings.toggle("appName"),
            Err(SettingsFieldError::NotBoolean("appName".into()))
        );
    }

    #[test]
    fn test_reset_keeps_bookkeeping() {
        let mut settings = AppSettings {
            app_name: "Changed".into(),
            updated_by: Some("a1".into()),
            updated_at: 42,
            ..Default::default()
        };
        settings.reset();
        assert_eq!(settings.app_name, DEFAULT_APP_NAME);
        assert_eq!(settings.updated_by.as_deref(), Some("a1"));
        assert_eq!(settings.updated_at, 42);
    }
}
