//! Admin Client - HTTP client for the admin server
//!
//! [`HttpClient`] wraps the REST API; [`Session`] keeps the signed-in
//! admin together with a [`PermissionGuard`] mirror used to decide which
//! UI affordances to show.

pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use session::Session;

// Re-export shared types for convenience
pub use shared::models::{AdminView, AuthResponse, RoleDetails};
pub use shared::{Action, ApiResponse, Module, Permission, PermissionGuard};
