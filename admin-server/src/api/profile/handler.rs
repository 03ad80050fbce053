//! Profile Handlers

use axum::{Json, extract::State};
use shared::models::{
    ActionType, AdminView, PasswordChange, Preferences, PreferencesUpdate, ProfileUpdate,
};
use validator::Validate;

use crate::activity::RequestMeta;
use crate::api::duplicate_as;
use crate::auth::CurrentAdmin;
use crate::auth::password::{hash_password, verify_password};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

pub(super) async fn view(state: &ServerState, admin: shared::models::Admin) -> AppResult<AdminView> {
    let role = match admin.role_id.as_deref() {
        Some(role_id) => state.roles.find_by_id(role_id).await?,
        None => None,
    };
    Ok(AdminView::new(admin, role.as_ref()))
}

/// GET /api/profile
pub async fn get(
    State(state): State<ServerState>,
    CurrentAdmin(admin): CurrentAdmin,
) -> AppResult<Json<ApiResponse<AdminView>>> {
    Ok(Json(ApiResponse::success(view(&state, admin).await?)))
}

/// PUT /api/profile
pub async fn update(
    State(state): State<ServerState>,
    CurrentAdmin(mut admin): CurrentAdmin,
    meta: RequestMeta,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<ApiResponse<AdminView>>> {
    payload.validate()?;

    if let Some(email) = payload.email.filter(|e| !e.trim().is_empty())
        && !email.eq_ignore_ascii_case(&admin.email)
    {
        if let Some(other) = state.admins.find_by_email(&email).await?
            && other.id != admin.id
        {
            return Err(AppError::with_message(
                ErrorCode::EmailExists,
                "Email is already in use",
            ));
        }
        admin.email = email;
    }
    if let Some(name) = payload.name.filter(|n| !n.trim().is_empty()) {
        admin.name = name.trim().to_string();
    }
    if let Some(phone) = payload.phone {
        admin.phone = Some(phone.trim().to_string()).filter(|p| !p.is_empty());
    }
    if let Some(bio) = payload.bio {
        admin.bio = Some(bio).filter(|b| !b.is_empty());
    }
    if let Some(department) = payload.department {
        admin.department = Some(department.trim().to_string()).filter(|d| !d.is_empty());
    }

    let admin = state
        .admins
        .save(&admin)
        .await
        .map_err(duplicate_as(ErrorCode::EmailExists))?;

    state.activity.record(
        &admin.id,
        ActionType::Update,
        "Updated own profile",
        None,
        &meta,
    );

    Ok(Json(ApiResponse::success_with_message(
        "Profile updated successfully",
        view(&state, admin).await?,
    )))
}

/// PUT /api/profile/password
pub async fn change_password(
    State(state): State<ServerState>,
    CurrentAdmin(admin): CurrentAdmin,
    meta: RequestMeta,
    Json(payload): Json<PasswordChange>,
) -> AppResult<Json<ApiResponse<()>>> {
    payload.validate()?;

    let credentials = state
        .admins
        .find_credentials_by_id(&admin.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AdminNotFound))?;

    if !verify_password(&payload.current_password, &credentials.password_hash) {
        crate::security_log!("WARN", "password_change_failed", admin_id = admin.id.clone());
        return Err(AppError::new(ErrorCode::PasswordIncorrect));
    }

    let password_hash = hash_password(&payload.new_password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
    state.admins.set_password(&admin.id, password_hash).await?;

    tracing::info!(admin_id = %admin.id, "Password changed");
    state.activity.record(
        &admin.id,
        ActionType::Update,
        "Changed password",
        None,
        &meta,
    );

    Ok(Json(ApiResponse::ok_with_message(
        "Password changed successfully",
    )))
}

/// PUT /api/profile/preferences
pub async fn update_preferences(
    State(state): State<ServerState>,
    CurrentAdmin(mut admin): CurrentAdmin,
    Json(payload): Json<PreferencesUpdate>,
) -> AppResult<Json<ApiResponse<Preferences>>> {
    payload.validate()?;

    admin.preferences.apply(payload);
    let admin = state.admins.save(&admin).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Preferences updated successfully",
        admin.preferences,
    )))
}
