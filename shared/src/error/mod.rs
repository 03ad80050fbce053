//! Unified error system for the admin panel
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response envelope (`success`, `message`, `data`)
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors (401)
//! - 2xxx: Permission errors (403)
//! - 3xxx: Role errors
//! - 4xxx: Admin errors
//! - 5xxx: Page errors
//! - 6xxx: Settings and upload errors
//! - 9xxx: System errors (500)
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::RoleDeactivated)
//!     .with_detail("requiredPermission", serde_json::json!({"module": "users", "action": "view"}));
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert!(!response.success);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult, set_expose_internal_errors};
