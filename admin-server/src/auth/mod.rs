//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`require_auth`] - 认证中间件 (Bearer token → [`CurrentAdmin`])
//! - [`require_permission`] 及其变体 - 授权中间件 (→ [`AccessGrant`])
//! - [`password`] - Argon2 密码哈希

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permission;

pub use extractor::{CurrentAdmin, OptionalGrant};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{
    AuthenticatedAs, optional_grant, require_all_permissions, require_any_permission,
    require_auth, require_permission, require_super_admin,
};
pub use permission::{AccessGrant, authorize};
