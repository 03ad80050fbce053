//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use shared::models::{ActionType, AdminView, AuthResponse, LoginRequest, RegisterRequest, Role};
use validator::Validate;

use crate::activity::RequestMeta;
use crate::api::duplicate_as;
use crate::auth::CurrentAdmin;
use crate::auth::password::{hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::NewAdmin;
use crate::security_log;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// Fixed delay on failed logins to blunt email enumeration by timing
const AUTH_FAILURE_DELAY_MS: u64 = 300;

fn issue_token(state: &ServerState, view: &AdminView) -> AppResult<String> {
    state
        .jwt_service
        .generate_token(&view.admin.id, &view.admin.email)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<ServerState>,
    meta: RequestMeta,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    req.validate()?;

    if state.admins.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::with_message(
            ErrorCode::EmailExists,
            "Admin with this email already exists",
        ));
    }

    let role = match req.role_id.as_deref() {
        // Open route: only active, non-superadmin roles can be chosen
        Some(role_id) => {
            let role = state
                .roles
                .find_by_id(role_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::RoleInvalid))?;
            if role.is_super_admin || !role.is_active {
                security_log!(
                    "WARN",
                    "register_role_rejected",
                    email = req.email.clone(),
                    role = role.name.clone()
                );
                return Err(AppError::with_message(
                    ErrorCode::RoleInvalid,
                    "Selected role cannot be used for registration",
                ));
            }
            role
        }
        None => state
            .roles
            .find_registration_default()
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::RoleInvalid,
                    "No default role available. Please contact administrator.",
                )
            })?,
    };

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let admin = state
        .admins
        .create(NewAdmin {
            name: req.name,
            email: req.email,
            password_hash,
            role_id: Some(role.id.clone()),
            is_active: true,
            phone: None,
            department: None,
            bio: None,
        })
        .await
        .map_err(duplicate_as(ErrorCode::EmailExists))?;

    tracing::info!(admin_id = %admin.id, role = %role.name, "Admin registered");
    state.activity.record(
        &admin.id,
        ActionType::Create,
        format!("Registered new admin: {}", admin.email),
        Some(serde_json::json!({ "id": admin.id })),
        &meta,
    );

    let view = AdminView::new(admin, Some(&role));
    let token = issue_token(&state, &view)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Admin registered successfully",
            AuthResponse { token, admin: view },
        )),
    ))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password share one message.
pub async fn login(
    State(state): State<ServerState>,
    meta: RequestMeta,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    req.validate()?;

    let Some(credentials) = state.admins.find_credentials(&req.email).await? else {
        security_log!("WARN", "login_failed", email = req.email.clone(), reason = "unknown_email");
        tokio::time::sleep(Duration::from_millis(AUTH_FAILURE_DELAY_MS)).await;
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Invalid credentials",
        ));
    };
    let admin = credentials.admin;

    if !admin.is_active {
        security_log!("WARN", "login_failed", email = admin.email.clone(), reason = "inactive");
        return Err(AppError::with_message(
            ErrorCode::AccountDisabled,
            "Account has been deactivated",
        ));
    }

    let role: Option<Role> = match admin.role_id.as_deref() {
        Some(role_id) => state.roles.find_by_id(role_id).await?,
        None => None,
    };
    let Some(role) = role.filter(|r| r.is_active) else {
        security_log!("WARN", "login_failed", email = admin.email.clone(), reason = "role_inactive");
        return Err(AppError::with_message(
            ErrorCode::AccountDisabled,
            "Your role has been deactivated. Contact administrator.",
        ));
    };

    if !verify_password(&req.password, &credentials.password_hash) {
        security_log!("WARN", "login_failed", email = admin.email.clone(), reason = "bad_password");
        tokio::time::sleep(Duration::from_millis(AUTH_FAILURE_DELAY_MS)).await;
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Invalid credentials",
        ));
    }

    state.admins.touch_last_login(&admin.id).await?;
    let admin = state
        .admins
        .find_by_id(&admin.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AdminNotFound))?;

    tracing::info!(admin_id = %admin.id, role = %role.name, "Admin logged in");
    state.activity.record(
        &admin.id,
        ActionType::Login,
        format!("Admin logged in: {}", admin.email),
        None,
        &meta,
    );

    let view = AdminView::new(admin, Some(&role));
    let token = issue_token(&state, &view)?;
    Ok(Json(ApiResponse::success_with_message(
        "Login successful",
        AuthResponse { token, admin: view },
    )))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    CurrentAdmin(admin): CurrentAdmin,
) -> AppResult<Json<ApiResponse<AdminView>>> {
    let role = match admin.role_id.as_deref() {
        Some(role_id) => state.roles.find_by_id(role_id).await?,
        None => None,
    };
    Ok(Json(ApiResponse::success(AdminView::new(
        admin,
        role.as_ref(),
    ))))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(
    State(state): State<ServerState>,
    meta: RequestMeta,
    CurrentAdmin(admin): CurrentAdmin,
) -> Json<ApiResponse<()>> {
    state.activity.record(
        &admin.id,
        ActionType::Logout,
        format!("Admin logged out: {}", admin.email),
        None,
        &meta,
    );
    Json(ApiResponse::ok_with_message("Logged out successfully"))
}
