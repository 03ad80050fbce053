//! Shared types for the admin panel
//!
//! Permission model, API models, error types and response envelope
//! used by both the server and the client.

pub mod error;
pub mod models;
pub mod permission;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use permission::{Action, Module, Permission, PermissionGuard, PermissionMatrix};
