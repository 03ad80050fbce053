//! 认证授权中间件
//!
//! [`require_auth`] 作为全局层运行；权限层按路由挂载，在其内侧执行：
//!
//! ```ignore
//! Router::new()
//!     .route("/api/roles", get(handler::list))
//!     .layer(middleware::from_fn_with_state(
//!         state.clone(),
//!         require_permission(Module::Roles, Action::View),
//!     ));
//! ```

use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;
use shared::permission::Requirement;
use shared::{Action, ErrorCode, Module, Permission};

use super::extractor::{CurrentAdmin, OptionalGrant};
use super::permission::{authorize, authorize_super_admin, optional_grant_for};
use super::{JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// 已认证管理员标记，写入响应扩展供日志中间件读取
#[derive(Debug, Clone)]
pub struct AuthenticatedAs {
    pub id: String,
    pub email: String,
}

/// 无需认证的 API 路由
fn is_public_route(method: &Method, path: &str) -> bool {
    match path {
        "/api/health" | "/api/auth/login" | "/api/auth/register" => return true,
        _ => {}
    }
    if method != Method::GET {
        return false;
    }
    matches!(
        path,
        "/api/app-settings" | "/api/app-settings/public" | "/api/app-settings/version"
    ) || path.starts_with("/api/app-settings/field/")
        || path.starts_with("/api/pages/slug/")
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
}

/// 认证中间件 - 要求管理员登录
///
/// 验证 `Authorization: Bearer <token>`，再按令牌主体重新读取管理员。
/// 成功后将 [`CurrentAdmin`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - 登录、注册、健康检查、公开设置、按 slug 读取页面
///
/// # 错误 (均为 401)
///
/// | 情况 | 错误码 |
/// |------|--------|
/// | 无令牌 | NotAuthenticated |
/// | 令牌无效 / 过期 | TokenInvalid / TokenExpired |
/// | 管理员不存在 | NotAuthenticated |
/// | 管理员已停用 | AccountDisabled |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();
    if !path.starts_with("/api/") || is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let Some(token) = bearer_token(&req) else {
        security_log!("WARN", "auth_missing", uri = req.uri().to_string());
        return Err(AppError::with_message(
            ErrorCode::NotAuthenticated,
            "Not authorized to access this route",
        ));
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = req.uri().to_string()
            );
            return Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Not authorized to access this route"),
            });
        }
    };

    let admin = state
        .admins
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::NotAuthenticated, "Admin not found"))?;

    if !admin.is_active {
        security_log!("WARN", "auth_inactive", admin_id = admin.id.clone());
        return Err(AppError::with_message(
            ErrorCode::AccountDisabled,
            "Account has been deactivated",
        ));
    }

    let tag = AuthenticatedAs {
        id: admin.id.clone(),
        email: admin.email.clone(),
    };
    req.extensions_mut().insert(CurrentAdmin(admin));

    let mut response = next.run(req).await;
    response.extensions_mut().insert(tag);
    Ok(response)
}

type GuardFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>;

async fn enforce(
    state: ServerState,
    requirement: Requirement,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let admin_id = req
        .extensions()
        .get::<CurrentAdmin>()
        .map(|a| a.0.id.clone())
        .ok_or_else(AppError::not_authenticated)?;

    let grant = authorize(&state, &admin_id, &requirement).await?;
    req.extensions_mut().insert(grant);
    Ok(next.run(req).await)
}

/// 权限检查中间件 - 要求单个模块操作
///
/// 通过后将 [`super::AccessGrant`] 注入请求扩展。
/// 拒绝时返回 403，响应体带 `requiredPermission`。
pub fn require_permission(
    module: Module,
    action: Action,
) -> impl Fn(State<ServerState>, Request, Next) -> GuardFuture + Clone + Send + 'static {
    let requirement = Requirement::One(Permission::new(module, action));
    move |State(state): State<ServerState>, req: Request, next: Next| -> GuardFuture {
        Box::pin(enforce(state, requirement.clone(), req, next))
    }
}

/// 任一权限满足即可 (OR)，拒绝时带 `requiredPermissions`
pub fn require_any_permission(
    permissions: &'static [Permission],
) -> impl Fn(State<ServerState>, Request, Next) -> GuardFuture + Clone + Send + 'static {
    move |State(state): State<ServerState>, req: Request, next: Next| -> GuardFuture {
        Box::pin(enforce(
            state,
            Requirement::Any(permissions.to_vec()),
            req,
            next,
        ))
    }
}

/// 全部权限满足 (AND)，拒绝时带 `requiredPermissions`
pub fn require_all_permissions(
    permissions: &'static [Permission],
) -> impl Fn(State<ServerState>, Request, Next) -> GuardFuture + Clone + Send + 'static {
    move |State(state): State<ServerState>, req: Request, next: Next| -> GuardFuture {
        Box::pin(enforce(
            state,
            Requirement::All(permissions.to_vec()),
            req,
            next,
        ))
    }
}

/// 超级管理员中间件
pub async fn require_super_admin(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let admin_id = req
        .extensions()
        .get::<CurrentAdmin>()
        .map(|a| a.0.id.clone())
        .ok_or_else(AppError::not_authenticated)?;

    let grant = authorize_super_admin(&state, &admin_id).await?;
    req.extensions_mut().insert(grant);
    Ok(next.run(req).await)
}

/// 可选权限信息 - 从不拒绝请求
///
/// 有有效令牌、管理员启用且角色可用时注入 `OptionalGrant(Some(..))`，
/// 其余情况 (匿名、令牌无效、查询失败) 注入 `OptionalGrant(None)`。
pub async fn optional_grant(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Response {
    let admin_id = match req.extensions().get::<CurrentAdmin>() {
        Some(admin) => Some(admin.0.id.clone()),
        None => bearer_token(&req)
            .and_then(|token| state.jwt_service.validate_token(token).ok())
            .map(|claims| claims.sub),
    };

    let grant = match admin_id {
        Some(id) => optional_grant_for(&state, &id).await,
        None => None,
    };
    req.extensions_mut().insert(OptionalGrant(grant));
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public_route(&Method::POST, "/api/auth/login"));
        assert!(is_public_route(&Method::POST, "/api/auth/register"));
        assert!(is_public_route(&Method::GET, "/api/app-settings"));
        assert!(is_public_route(&Method::GET, "/api/app-settings/field/appName"));
        assert!(is_public_route(&Method::GET, "/api/pages/slug/about"));

        assert!(!is_public_route(&Method::PUT, "/api/app-settings"));
        assert!(!is_public_route(&Method::GET, "/api/auth/me"));
        assert!(!is_public_route(&Method::GET, "/api/pages"));
        assert!(!is_public_route(&Method::DELETE, "/api/pages/slug/about"));
    }
}
