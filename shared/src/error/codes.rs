//! Unified error codes for the admin panel
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Role errors
//! - 4xxx: Admin errors
//! - 5xxx: Page errors
//! - 6xxx: Settings and upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the admin UI can switch
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field is missing
    RequiredField = 7,
    /// Value is out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Not authenticated
    NotAuthenticated = 1001,
    /// Invalid email or password
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled (authentication stage)
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Module/action not granted
    PermissionDenied = 2001,
    /// Account deactivated (authorization stage)
    AccountDeactivated = 2002,
    /// Admin has no role, or the role no longer exists
    RoleNotAssigned = 2003,
    /// Assigned role is deactivated
    RoleDeactivated = 2004,
    /// Super admin role required
    SuperAdminRequired = 2005,
    /// Settings field is not publicly readable
    FieldRequiresAuth = 2006,

    // ==================== 3xxx: Role ====================
    /// Role not found
    RoleNotFound = 3001,
    /// Role name already exists
    RoleNameExists = 3002,
    /// Role still has admins assigned
    RoleInUse = 3003,
    /// Super admin or default role cannot be removed
    RoleProtected = 3004,
    /// Selected role is invalid or inactive
    RoleInvalid = 3005,

    // ==================== 4xxx: Admin ====================
    /// Admin not found
    AdminNotFound = 4001,
    /// Email already in use
    EmailExists = 4002,
    /// Last active super admin cannot be removed
    LastSuperAdmin = 4003,
    /// Admin cannot delete their own account
    CannotDeleteSelf = 4004,
    /// Current password is incorrect
    PasswordIncorrect = 4005,
    /// User not found
    UserNotFound = 4101,

    // ==================== 5xxx: Page ====================
    /// Page not found
    PageNotFound = 5001,
    /// Page slug already exists
    SlugExists = 5002,

    // ==================== 6xxx: Settings / Upload ====================
    /// Settings field not found
    SettingFieldNotFound = 6001,
    /// Settings field is not a boolean
    SettingFieldNotBoolean = 6002,
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid image file
    InvalidImageFile = 6503,
    /// No file provided
    NoFileProvided = 6504,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// File storage error
    StorageError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Not authorized to access this route",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Not authorized to access this route",
            ErrorCode::AccountDisabled => "Account has been deactivated",

            // Permission
            ErrorCode::PermissionDenied => "Access denied",
            ErrorCode::AccountDeactivated => "Your account has been deactivated",
            ErrorCode::RoleNotAssigned => "No role assigned. Contact administrator.",
            ErrorCode::RoleDeactivated => "Your role has been deactivated. Contact administrator.",
            ErrorCode::SuperAdminRequired => "Access denied. Super admin privileges required.",
            ErrorCode::FieldRequiresAuth => "This field requires authentication",

            // Role
            ErrorCode::RoleNotFound => "Role not found",
            ErrorCode::RoleNameExists => "Role with this name already exists",
            ErrorCode::RoleInUse => "Role is assigned to one or more admins",
            ErrorCode::RoleProtected => "Role cannot be deleted",
            ErrorCode::RoleInvalid => "Invalid role selected",

            // Admin
            ErrorCode::AdminNotFound => "Admin not found",
            ErrorCode::EmailExists => "Email already in use",
            ErrorCode::LastSuperAdmin => "Cannot remove the only super admin",
            ErrorCode::CannotDeleteSelf => "Cannot delete your own account",
            ErrorCode::PasswordIncorrect => "Current password is incorrect",
            ErrorCode::UserNotFound => "User not found",

            // Page
            ErrorCode::PageNotFound => "Page not found",
            ErrorCode::SlugExists => "A page with this slug already exists",

            // Settings / Upload
            ErrorCode::SettingFieldNotFound => "Setting field not found",
            ErrorCode::SettingFieldNotBoolean => "Field is not a boolean",
            ErrorCode::FileTooLarge => "File is too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "Please upload an image file",

            // System
            ErrorCode::InternalError => "Server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageError => "File storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AccountDeactivated),
            2003 => Ok(ErrorCode::RoleNotAssigned),
            2004 => Ok(ErrorCode::RoleDeactivated),
            2005 => Ok(ErrorCode::SuperAdminRequired),
            2006 => Ok(ErrorCode::FieldRequiresAuth),

            // Role
            3001 => Ok(ErrorCode::RoleNotFound),
            3002 => Ok(ErrorCode::RoleNameExists),
            3003 => Ok(ErrorCode::RoleInUse),
            3004 => Ok(ErrorCode::RoleProtected),
            3005 => Ok(ErrorCode::RoleInvalid),

            // Admin
            4001 => Ok(ErrorCode::AdminNotFound),
            4002 => Ok(ErrorCode::EmailExists),
            4003 => Ok(ErrorCode::LastSuperAdmin),
            4004 => Ok(ErrorCode::CannotDeleteSelf),
            4005 => Ok(ErrorCode::PasswordIncorrect),
            4101 => Ok(ErrorCode::UserNotFound),

            // Page
            5001 => Ok(ErrorCode::PageNotFound),
            5002 => Ok(ErrorCode::SlugExists),

            // Settings / Upload
            6001 => Ok(ErrorCode::SettingFieldNotFound),
            6002 => Ok(ErrorCode::SettingFieldNotBoolean),
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::RoleInUse.code(), 3003);
        assert_eq!(ErrorCode::LastSuperAdmin.code(), 4003);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(6), Err(InvalidErrorCode(6)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::RoleDeactivated).unwrap();
        assert_eq!(json, "2004");
        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::EmailExists);
        assert!(serde_json::from_str::<ErrorCode>("4242").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
        assert_eq!(ErrorCode::PermissionDenied.to_string(), "E2001");
    }
}
