//! 授权检查
//!
//! 每次都从数据库重新读取管理员和角色，不使用令牌或缓存中的权限数据。
//! 检查顺序固定，任何一步失败即终止：
//!
//! 1. 管理员存在 (401)
//! 2. 管理员启用 (403)
//! 3. 已分配且可解析的角色 (403 + 所需权限)
//! 4. 角色启用 (403 + 所需权限)
//! 5. 超级管理员直接放行
//! 6-7. 权限矩阵查找 (403 + 所需权限)

use shared::models::{Admin, Role};
use shared::permission::{Requirement, evaluate};
use shared::{ErrorCode, PermissionMatrix};

use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// 授权通过后交给处理器的结果
#[derive(Debug, Clone)]
pub struct AccessGrant {
    pub permissions: PermissionMatrix,
    pub is_super_admin: bool,
    pub current_admin: Admin,
    pub role: Role,
}

/// 按固定顺序对 `admin_id` 执行授权检查
pub async fn authorize(
    state: &ServerState,
    admin_id: &str,
    requirement: &Requirement,
) -> AppResult<AccessGrant> {
    let (admin, role) = load_admin_and_role(state, admin_id, Some(requirement)).await?;

    if let Err(denial) = evaluate(role.is_super_admin, &role.permissions, requirement) {
        security_log!(
            "WARN",
            "permission_denied",
            admin_id = admin.id.clone(),
            role = role.name.clone(),
            required = requirement.to_string()
        );
        let (key, value) = requirement.diagnostic();
        return Err(
            AppError::with_message(ErrorCode::PermissionDenied, denial.message())
                .with_detail(key, value),
        );
    }

    Ok(grant(admin, role))
}

/// 仅超级管理员角色可通过
pub async fn authorize_super_admin(state: &ServerState, admin_id: &str) -> AppResult<AccessGrant> {
    let (admin, role) = load_admin_and_role(state, admin_id, None).await?;

    if !role.is_super_admin {
        security_log!(
            "WARN",
            "super_admin_required",
            admin_id = admin.id.clone(),
            role = role.name.clone()
        );
        return Err(AppError::new(ErrorCode::SuperAdminRequired));
    }

    Ok(grant(admin, role))
}

/// 不带权限要求，读取启用角色下管理员的权限
///
/// 从不失败：存储错误和任何拒绝都返回 `None`。
pub async fn optional_grant_for(state: &ServerState, admin_id: &str) -> Option<AccessGrant> {
    match load_admin_and_role(state, admin_id, None).await {
        Ok((admin, role)) => Some(grant(admin, role)),
        Err(e) => {
            tracing::debug!(admin_id = %admin_id, "No optional grant: {}", e);
            None
        }
    }
}

fn grant(admin: Admin, role: Role) -> AccessGrant {
    AccessGrant {
        permissions: role.permissions.clone(),
        is_super_admin: role.is_super_admin,
        current_admin: admin,
        role,
    }
}

/// 步骤 1-4，所有检查变体共用
async fn load_admin_and_role(
    state: &ServerState,
    admin_id: &str,
    requirement: Option<&Requirement>,
) -> AppResult<(Admin, Role)> {
    let with_diagnostic = |err: AppError| match requirement {
        Some(req) => {
            let (key, value) = req.diagnostic();
            err.with_detail(key, value)
        }
        None => err,
    };

    let admin = state
        .admins
        .find_by_id(admin_id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::NotAuthenticated, "Admin not found"))?;

    if !admin.is_active {
        return Err(AppError::with_message(
            ErrorCode::AccountDeactivated,
            "Your account has been deactivated",
        ));
    }

    let role = match admin.role_id.as_deref() {
        Some(role_id) => state.roles.find_by_id(role_id).await?,
        None => None,
    };
    let Some(role) = role else {
        return Err(with_diagnostic(AppError::with_message(
            ErrorCode::RoleNotAssigned,
            "No role assigned. Contact administrator.",
        )));
    };

    if !role.is_active {
        return Err(with_diagnostic(AppError::with_message(
            ErrorCode::RoleDeactivated,
            "Your role has been deactivated. Contact administrator.",
        )));
    }

    Ok((admin, role))
}
