//! Admin API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{ActionType, Admin, AdminCreate, AdminUpdate, AdminView, Role};
use validator::Validate;

use crate::activity::RequestMeta;
use crate::api::duplicate_as;
use crate::auth::AccessGrant;
use crate::auth::password::hash_password;
use crate::core::ServerState;
use crate::db::repository::NewAdmin;
use crate::security_log;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

async fn load(state: &ServerState, id: &str) -> AppResult<Admin> {
    state
        .admins
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AdminNotFound))
}

async fn role_of(state: &ServerState, admin: &Admin) -> AppResult<Option<Role>> {
    match admin.role_id.as_deref() {
        Some(role_id) => Ok(state.roles.find_by_id(role_id).await?),
        None => Ok(None),
    }
}

/// Role must exist and be active to be assigned; superadmin roles are
/// only handed out by superadmins
async fn assignable_role(state: &ServerState, grant: &AccessGrant, role_id: &str) -> AppResult<Role> {
    let role = state
        .roles
        .find_by_id(role_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoleInvalid))?;
    if !role.is_active {
        return Err(AppError::with_message(
            ErrorCode::RoleInvalid,
            "Selected role is inactive",
        ));
    }
    if role.is_super_admin && !grant.is_super_admin {
        security_log!(
            "WARN",
            "super_role_assignment_denied",
            admin_id = grant.current_admin.id.clone(),
            role = role.name.clone()
        );
        return Err(AppError::with_message(
            ErrorCode::SuperAdminRequired,
            "Only super admins can assign super admin roles",
        ));
    }
    Ok(role)
}

/// Refuse when `admin` is the last active superadmin
async fn ensure_not_last_super_admin(
    state: &ServerState,
    admin: &Admin,
    current_role: Option<&Role>,
    message: &str,
) -> AppResult<()> {
    let is_active_super = admin.is_active && current_role.is_some_and(|r| r.is_super_admin);
    if is_active_super && state.admins.count_active_super_admins().await? <= 1 {
        return Err(AppError::with_message(ErrorCode::LastSuperAdmin, message));
    }
    Ok(())
}

/// GET /api/admins - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<AdminView>>>> {
    let roles: HashMap<String, Role> = state
        .roles
        .find_all()
        .await?
        .into_iter()
        .map(|r| (r.id.clone(), r))
        .collect();

    let admins: Vec<AdminView> = state
        .admins
        .find_all()
        .await?
        .into_iter()
        .map(|admin| {
            let role = admin.role_id.as_ref().and_then(|id| roles.get(id));
            AdminView::new(admin, role)
        })
        .collect();

    let total = admins.len();
    Ok(Json(ApiResponse::success(admins).with_detail("total", total)))
}

/// GET /api/admins/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<AdminView>>> {
    let admin = load(&state, &id).await?;
    let role = role_of(&state, &admin).await?;
    Ok(Json(ApiResponse::success(AdminView::new(admin, role.as_ref()))))
}

/// POST /api/admins
pub async fn create(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Json(payload): Json<AdminCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<AdminView>>)> {
    payload.validate()?;

    if state.admins.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::with_message(
            ErrorCode::EmailExists,
            "Admin with this email already exists",
        ));
    }
    let role = assignable_role(&state, &grant, &payload.role_id).await?;

    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let admin = state
        .admins
        .create(NewAdmin {
            name: payload.name,
            email: payload.email,
            password_hash,
            role_id: Some(role.id.clone()),
            is_active: payload.is_active.unwrap_or(true),
            phone: payload.phone.filter(|p| !p.is_empty()),
            department: payload.department.filter(|d| !d.is_empty()),
            bio: payload.bio.filter(|b| !b.is_empty()),
        })
        .await
        .map_err(duplicate_as(ErrorCode::EmailExists))?;

    tracing::info!(admin_id = %grant.current_admin.id, created = %admin.id, "Admin created");
    state.activity.record(
        &grant.current_admin.id,
        ActionType::Create,
        format!("Created Admin: {} with Role: {}", admin.name, role.name),
        Some(serde_json::json!({ "id": admin.id })),
        &meta,
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Admin created successfully",
            AdminView::new(admin, Some(&role)),
        )),
    ))
}

/// PUT /api/admins/{id}
///
/// Deactivating the last active superadmin, or moving them to a role
/// without superadmin rights, is refused.
pub async fn update(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Path(id): Path<String>,
    Json(payload): Json<AdminUpdate>,
) -> AppResult<Json<ApiResponse<AdminView>>> {
    payload.validate()?;
    let mut admin = load(&state, &id).await?;
    let current_role = role_of(&state, &admin).await?;

    if payload.is_active == Some(false) {
        ensure_not_last_super_admin(
            &state,
            &admin,
            current_role.as_ref(),
            "Cannot deactivate the only super admin",
        )
        .await?;
    }

    let new_role = match payload.role_id.as_deref().filter(|r| !r.is_empty()) {
        Some(role_id) if admin.role_id.as_deref() == Some(role_id) => current_role.clone(),
        Some(role_id) => Some(assignable_role(&state, &grant, role_id).await?),
        None => None,
    };
    if let Some(role) = &new_role
        && !role.is_super_admin
    {
        ensure_not_last_super_admin(
            &state,
            &admin,
            current_role.as_ref(),
            "Cannot remove super admin role from the only super admin",
        )
        .await?;
    }

    if let Some(email) = payload.email
        && !email.eq_ignore_ascii_case(&admin.email)
    {
        if state.admins.find_by_email(&email).await?.is_some() {
            return Err(AppError::with_message(
                ErrorCode::EmailExists,
                "Email already in use",
            ));
        }
        admin.email = email;
    }
    if let Some(name) = payload.name {
        admin.name = name.trim().to_string();
    }
    if let Some(phone) = payload.phone {
        admin.phone = Some(phone).filter(|p| !p.is_empty());
    }
    if let Some(department) = payload.department {
        admin.department = Some(department).filter(|d| !d.is_empty());
    }
    if let Some(bio) = payload.bio {
        admin.bio = Some(bio).filter(|b| !b.is_empty());
    }
    if let Some(is_active) = payload.is_active {
        admin.is_active = is_active;
    }
    let role_changed = new_role
        .as_ref()
        .is_some_and(|r| admin.role_id.as_deref() != Some(r.id.as_str()));
    if let Some(role) = &new_role {
        admin.role_id = Some(role.id.clone());
    }

    let admin = state
        .admins
        .save(&admin)
        .await
        .map_err(duplicate_as(ErrorCode::EmailExists))?;
    let role = new_role.or(current_role);

    let (action, description) = if role_changed {
        (
            ActionType::RoleChange,
            format!(
                "Changed role of {} to {}",
                admin.name,
                role.as_ref().map(|r| r.name.as_str()).unwrap_or("No Role")
            ),
        )
    } else {
        (ActionType::Update, format!("Updated Admin: {}", admin.name))
    };
    tracing::info!(admin_id = %grant.current_admin.id, updated = %admin.id, "Admin updated");
    state.activity.record(
        &grant.current_admin.id,
        action,
        description,
        Some(serde_json::json!({ "id": admin.id })),
        &meta,
    );

    Ok(Json(ApiResponse::success_with_message(
        "Admin updated successfully",
        AdminView::new(admin, role.as_ref()),
    )))
}

/// DELETE /api/admins/{id}
pub async fn delete(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let admin = load(&state, &id).await?;
    let role = role_of(&state, &admin).await?;

    ensure_not_last_super_admin(
        &state,
        &admin,
        role.as_ref(),
        "Cannot delete the only super admin",
    )
    .await?;

    if admin.id == grant.current_admin.id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    state.admins.delete(&admin.id).await?;

    tracing::info!(admin_id = %grant.current_admin.id, deleted = %admin.id, "Admin deleted");
    state.activity.record(
        &grant.current_admin.id,
        ActionType::Delete,
        format!("Deleted Admin: {} ({})", admin.name, admin.email),
        Some(serde_json::json!({ "id": admin.id })),
        &meta,
    );

    Ok(Json(ApiResponse::ok_with_message("Admin deleted successfully")))
}
