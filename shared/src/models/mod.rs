//! Data models
//!
//! Shared between admin-server and admin-client (via API).
//! All IDs are UUID strings, timestamps are Unix millis.

pub mod activity_log;
pub mod admin;
pub mod app_settings;
pub mod auth;
pub mod page;
pub mod role;
pub mod user;

// Re-exports
pub use activity_log::*;
pub use admin::*;
pub use app_settings::*;
pub use auth::*;
pub use page::*;
pub use role::*;
pub use user::*;
