//! User Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use shared::models::{ActionType, User, UserCreate, UserUpdate};
use validator::Validate;

use crate::activity::RequestMeta;
use crate::api::duplicate_as;
use crate::auth::AccessGrant;
use crate::auth::password::hash_password;
use crate::core::ServerState;
use crate::db::repository::RepoError;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// GET /api/users - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    let users = state.users.find_all().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    payload.validate()?;

    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
    let user = state
        .users
        .create(payload, password_hash)
        .await
        .map_err(duplicate_as(ErrorCode::EmailExists))?;

    state.activity.record(
        &grant.current_admin.id,
        ActionType::Create,
        format!("Created new user: {}", user.name),
        Some(json!({ "id": user.id })),
        &meta,
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message("User created successfully", user)),
    ))
}

/// PUT /api/users/{id} - name, email, isActive
pub async fn update(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<ApiResponse<User>>> {
    payload.validate()?;

    let user = state.users.update(&id, payload).await.map_err(|e| match e {
        RepoError::NotFound(_) => AppError::new(ErrorCode::UserNotFound),
        RepoError::Duplicate(_) => AppError::new(ErrorCode::EmailExists),
        other => other.into(),
    })?;

    state.activity.record(
        &grant.current_admin.id,
        ActionType::Update,
        format!("Updated user: {}", user.name),
        Some(json!({ "id": user.id })),
        &meta,
    );

    Ok(Json(ApiResponse::success_with_message("User updated successfully", user)))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let user = state
        .users
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    state.users.delete(&user.id).await?;

    state.activity.record(
        &grant.current_admin.id,
        ActionType::Delete,
        format!("Deleted user: {}", user.name),
        Some(json!({ "id": user.id })),
        &meta,
    );

    Ok(Json(ApiResponse::<()>::ok_with_message("User deleted successfully")))
}
