//! Role permission model
//!
//! - [`PermissionMatrix`] - typed module → action → bool map (unset = denied)
//! - [`evaluate`] - superadmin bypass, then strict lookup
//! - [`PermissionGuard`] - client-side mirror for UI gating

mod check;
mod guard;
mod matrix;

pub use check::{Denial, Requirement, evaluate};
pub use guard::PermissionGuard;
pub use matrix::{Action, Module, ParsePermissionError, Permission, PermissionMatrix};
