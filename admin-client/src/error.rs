//! Client error types

use serde_json::Value;
use shared::Permission;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 401 - missing, expired or rejected credentials
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// 403 - keeps the permission(s) the server asked for
    #[error("Permission denied: {message}")]
    Forbidden {
        message: String,
        required: Vec<Permission>,
    },

    /// 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// 400 - validation or business rule; `errors` holds per-field details
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        errors: Option<Value>,
    },

    /// Any other non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the session should be dropped
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Required permissions of a 403, empty otherwise
    pub fn required_permissions(&self) -> &[Permission] {
        match self {
            ClientError::Forbidden { required, .. } => required,
            _ => &[],
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
