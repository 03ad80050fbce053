//! Role API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{ActionType, Role, RoleCreate, RoleUpdate, RoleWithCount};
use shared::PermissionMatrix;
use validator::Validate;

use crate::activity::RequestMeta;
use crate::api::duplicate_as;
use crate::auth::AccessGrant;
use crate::core::ServerState;
use crate::db::repository::role::NewRole;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

async fn load(state: &ServerState, id: &str) -> AppResult<Role> {
    state
        .roles
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound))
}

/// GET /api/roles - newest first, with admin counts
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<RoleWithCount>>>> {
    let roles = state.roles.find_all_with_counts().await?;
    Ok(Json(ApiResponse::success(roles)))
}

/// GET /api/roles/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Role>>> {
    Ok(Json(ApiResponse::success(load(&state, &id).await?)))
}

/// POST /api/roles
///
/// Only superadmins may create superadmin roles. An omitted matrix
/// becomes the default skeleton (everything denied).
pub async fn create(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Json(payload): Json<RoleCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Role>>)> {
    payload.validate()?;

    if payload.is_super_admin && !grant.is_super_admin {
        return Err(AppError::with_message(
            ErrorCode::SuperAdminRequired,
            "Only super admins can create super admin roles",
        ));
    }

    let role = state
        .roles
        .create(NewRole {
            name: payload.name.trim().to_string(),
            description: payload.description.trim().to_string(),
            is_super_admin: payload.is_super_admin,
            is_default: false,
            is_active: payload.is_active.unwrap_or(true),
            permissions: payload
                .permissions
                .unwrap_or_else(PermissionMatrix::default_skeleton),
        })
        .await
        .map_err(duplicate_as(ErrorCode::RoleNameExists))?;

    tracing::info!(admin_id = %grant.current_admin.id, role = %role.name, "Role created");
    state.activity.record(
        &grant.current_admin.id,
        ActionType::Create,
        format!(
            "Created new role: {} with permissions: {}",
            role.name,
            serde_json::to_string(&role.permissions).unwrap_or_default()
        ),
        Some(serde_json::json!({ "id": role.id })),
        &meta,
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message("Role created successfully", role)),
    ))
}

/// PUT /api/roles/{id}
///
/// A present `permissions` replaces the whole matrix.
pub async fn update(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Path(id): Path<String>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<ApiResponse<Role>>> {
    payload.validate()?;
    let mut role = load(&state, &id).await?;

    if (role.is_super_admin || payload.is_super_admin == Some(true)) && !grant.is_super_admin {
        return Err(AppError::with_message(
            ErrorCode::SuperAdminRequired,
            "Only super admins can edit super admin roles",
        ));
    }
    if role.is_default && payload.is_active == Some(false) {
        return Err(AppError::with_message(
            ErrorCode::RoleProtected,
            "Cannot deactivate default role",
        ));
    }
    // Demoting or deactivating a superadmin role must leave an active superadmin
    let loses_super = role.is_super_admin
        && (payload.is_super_admin == Some(false) || payload.is_active == Some(false));
    if loses_super {
        let remaining = state.admins.count_active_super_admins().await?;
        let on_this_role = state.admins.count_active_by_role(&role.id).await?;
        if on_this_role > 0 && remaining <= on_this_role {
            return Err(AppError::new(ErrorCode::LastSuperAdmin));
        }
    }

    if let Some(name) = payload.name {
        role.name = name.trim().to_string();
    }
    if let Some(description) = payload.description {
        role.description = description.trim().to_string();
    }
    if let Some(is_super_admin) = payload.is_super_admin {
        role.is_super_admin = is_super_admin;
    }
    if let Some(is_active) = payload.is_active {
        role.is_active = is_active;
    }
    if let Some(permissions) = payload.permissions {
        role.permissions = permissions;
    }

    let role = state
        .roles
        .save(&role)
        .await
        .map_err(duplicate_as(ErrorCode::RoleNameExists))?;

    tracing::info!(admin_id = %grant.current_admin.id, role = %role.name, "Role updated");
    state.activity.record(
        &grant.current_admin.id,
        ActionType::RoleChange,
        format!("Updated role: {}", role.name),
        Some(serde_json::json!({ "id": role.id })),
        &meta,
    );

    Ok(Json(ApiResponse::success_with_message(
        "Role updated successfully",
        role,
    )))
}

/// DELETE /api/roles/{id}
///
/// Superadmin roles, default roles and roles still assigned to an admin
/// cannot be deleted.
pub async fn delete(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let role = load(&state, &id).await?;

    if role.is_super_admin {
        return Err(AppError::with_message(
            ErrorCode::RoleProtected,
            "Cannot delete super admin role",
        ));
    }
    if role.is_default {
        return Err(AppError::with_message(
            ErrorCode::RoleProtected,
            "Cannot delete default role",
        ));
    }
    let admin_count = state.admins.count_by_role(&role.id).await?;
    if admin_count > 0 {
        return Err(AppError::with_message(
            ErrorCode::RoleInUse,
            format!(
                "Cannot delete role. {} admin(s) are assigned to this role.",
                admin_count
            ),
        ));
    }

    state.roles.delete(&role.id).await?;

    tracing::info!(admin_id = %grant.current_admin.id, role = %role.name, "Role deleted");
    state.activity.record(
        &grant.current_admin.id,
        ActionType::Delete,
        format!("Deleted role: {}", role.name),
        Some(serde_json::json!({ "id": role.id })),
        &meta,
    );

    Ok(Json(ApiResponse::ok_with_message("Role deleted successfully")))
}
