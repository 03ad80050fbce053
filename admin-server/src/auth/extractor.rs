//! 处理器提取器
//!
//! 中间件把认证/授权结果放进请求扩展，这里把它们取出来。

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::models::Admin;

use super::AccessGrant;
use crate::core::ServerState;
use crate::utils::AppError;

/// 当前登录的管理员 (由 [`super::require_auth`] 注入，不含密码)
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub Admin);

/// 可选授权结果 (由 [`super::optional_grant`] 注入)
#[derive(Debug, Clone, Default)]
pub struct OptionalGrant(pub Option<AccessGrant>);

impl FromRequestParts<ServerState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAdmin>()
            .cloned()
            .ok_or_else(AppError::not_authenticated)
    }
}

impl FromRequestParts<ServerState> for AccessGrant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AccessGrant>().cloned().ok_or_else(|| {
            tracing::error!(uri = %parts.uri, "Handler expects a grant but no permission layer ran");
            AppError::internal("Missing authorization grant")
        })
    }
}

impl FromRequestParts<ServerState> for OptionalGrant {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<OptionalGrant>()
            .cloned()
            .unwrap_or_default())
    }
}
