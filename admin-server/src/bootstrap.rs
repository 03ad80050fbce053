//! 启动时数据初始化
//!
//! - 角色表为空时写入默认角色
//! - 没有任何管理员且配置了 `BOOTSTRAP_ADMIN_*` 时创建首个超级管理员

use shared::PermissionMatrix;
use shared::{Action, Module};

use crate::auth::password::hash_password;
use crate::core::ServerState;
use crate::db::repository::NewAdmin;
use crate::db::repository::role::NewRole;
use crate::utils::{AppError, AppResult};

const SUPER_ADMIN_ROLE: &str = "Super Admin";

fn grant(mut matrix: PermissionMatrix, grants: &[(Module, &[Action])]) -> PermissionMatrix {
    for (module, actions) in grants {
        for action in *actions {
            matrix.set(*module, *action, true);
        }
    }
    matrix
}

/// 四个内置角色，均标记为 `isDefault`
fn default_roles() -> Vec<NewRole> {
    use Action::*;
    const CRUD: &[Action] = &[View, Create, Edit, Delete];
    let skeleton = PermissionMatrix::default_skeleton;

    let role = |name: &str, description: &str, is_super_admin: bool, permissions| NewRole {
        name: name.to_string(),
        description: description.to_string(),
        is_super_admin,
        is_default: true,
        is_active: true,
        permissions,
    };

    vec![
        role(
            SUPER_ADMIN_ROLE,
            "Full system access with all permissions",
            true,
            PermissionMatrix::full(),
        ),
        role(
            "Content Manager",
            "Manage products and content",
            false,
            grant(
                skeleton(),
                &[
                    (Module::Dashboard, &[View]),
                    (Module::Users, &[View]),
                    (Module::Products, CRUD),
                    (Module::Orders, &[View]),
                    (Module::Analytics, &[View]),
                    (Module::Settings, &[View]),
                    (Module::ActivityLogs, &[View]),
                    (Module::Pages, CRUD),
                ],
            ),
        ),
        role(
            "Customer Support",
            "Handle customer orders and inquiries",
            false,
            grant(
                skeleton(),
                &[
                    (Module::Dashboard, &[View]),
                    (Module::Users, &[View, Edit]),
                    (Module::Products, &[View]),
                    (Module::Orders, &[View, Create, Edit]),
                    (Module::Settings, &[View]),
                ],
            ),
        ),
        role(
            "Viewer",
            "Read-only access to dashboard",
            false,
            grant(
                skeleton(),
                &[
                    (Module::Dashboard, &[View]),
                    (Module::Users, &[View]),
                    (Module::Products, &[View]),
                    (Module::Orders, &[View]),
                    (Module::Analytics, &[View]),
                    (Module::Settings, &[View]),
                ],
            ),
        ),
    ]
}

/// 写入默认角色和首个超级管理员；可重复执行
pub async fn run(state: &ServerState) -> AppResult<()> {
    seed_roles(state).await?;
    seed_first_admin(state).await
}

async fn seed_roles(state: &ServerState) -> AppResult<()> {
    if state.roles.count().await? > 0 {
        return Ok(());
    }

    let roles = default_roles();
    let total = roles.len();
    for role in roles {
        state.roles.create(role).await?;
    }
    tracing::info!(count = total, "Seeded default roles");
    Ok(())
}

async fn seed_first_admin(state: &ServerState) -> AppResult<()> {
    let Some(bootstrap) = &state.config.bootstrap_admin else {
        return Ok(());
    };
    if state.admins.count().await? > 0 {
        return Ok(());
    }

    let role = state
        .roles
        .find_all()
        .await?
        .into_iter()
        .find(|r| r.is_super_admin && r.is_active)
        .ok_or_else(|| AppError::internal("No active super admin role to assign"))?;

    let password_hash = hash_password(&bootstrap.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let admin = state
        .admins
        .create(NewAdmin {
            name: "Super Administrator".to_string(),
            email: bootstrap.email.clone(),
            password_hash,
            role_id: Some(role.id),
            is_active: true,
            phone: None,
            department: None,
            bio: None,
        })
        .await?;

    tracing::info!(email = %admin.email, "Created first super admin");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BootstrapAdmin;

    #[tokio::test]
    async fn test_seed_is_idempotent() -> AppResult<()> {
        let dir = tempfile::tempdir().unwrap();
        let mut state = ServerState::for_tests(dir.path().to_string_lossy())
            .await
            .unwrap();
        state.config.bootstrap_admin = Some(BootstrapAdmin {
            email: "root@example.com".into(),
            password: "changeme123".into(),
        });

        run(&state).await?;
        run(&state).await?;

        let roles = state.roles.find_all().await?;
        assert_eq!(roles.len(), 4);
        assert!(roles.iter().all(|r| r.is_default));
        assert_eq!(roles.iter().filter(|r| r.is_super_admin).count(), 1);

        let viewer = roles.iter().find(|r| r.name == "Viewer").unwrap();
        assert!(viewer.permissions.allows(Module::Products, Action::View));
        assert!(!viewer.permissions.allows(Module::Products, Action::Edit));
        assert!(!viewer.permissions.has_module(Module::Pages));

        assert_eq!(state.admins.count().await?, 1);
        assert_eq!(state.admins.count_active_super_admins().await?, 1);
        Ok(())
    }
}
