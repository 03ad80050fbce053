//! App Settings Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use shared::models::{
    ActionType, AppSettings, AppSettingsUpdate, PublicSettings, PublicSettingsDetail,
};
use shared::permission::{Requirement, evaluate};
use shared::{Action, Module, Permission};
use validator::Validate;

use crate::activity::RequestMeta;
use crate::auth::{AccessGrant, OptionalGrant};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

const API_VERSION: &str = "1.0.0";

fn meta() -> Value {
    json!({
        "version": API_VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })
}

/// Full settings for permitted admins, public subset for anonymous callers
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SettingsView {
    Full(Box<AppSettings>),
    Public(PublicSettings),
}

/// GET /api/app-settings
///
/// Anonymous → public subset. Authenticated → full settings when the role
/// is superadmin or grants `settings.view`, otherwise 403.
pub async fn get_settings(
    State(state): State<ServerState>,
    OptionalGrant(grant): OptionalGrant,
) -> AppResult<Json<ApiResponse<SettingsView>>> {
    let settings = state.settings.get().await?;

    let Some(grant) = grant else {
        return Ok(Json(
            ApiResponse::success(SettingsView::Public(settings.public_view()))
                .with_detail("meta", meta()),
        ));
    };

    let requirement = Requirement::One(Permission::new(Module::Settings, Action::View));
    if let Err(denial) = evaluate(grant.is_super_admin, &grant.permissions, &requirement) {
        let (key, value) = requirement.diagnostic();
        return Err(
            AppError::with_message(ErrorCode::PermissionDenied, denial.message())
                .with_detail(key, value),
        );
    }

    let meta = json!({
        "version": API_VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "lastUpdatedBy": settings.updated_by,
        "lastUpdatedAt": settings.updated_at,
    });
    Ok(Json(
        ApiResponse::success(SettingsView::Full(Box::new(settings))).with_detail("meta", meta),
    ))
}

/// GET /api/app-settings/public
pub async fn get_public(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<PublicSettingsDetail>>> {
    let settings = state.settings.get().await?;
    Ok(Json(
        ApiResponse::success(settings.public_detail()).with_detail("meta", meta()),
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    api_version: &'static str,
    app_version: &'static str,
    environment: String,
}

/// GET /api/app-settings/version
pub async fn version(State(state): State<ServerState>) -> Json<ApiResponse<VersionInfo>> {
    Json(
        ApiResponse::success(VersionInfo {
            api_version: API_VERSION,
            app_version: env!("CARGO_PKG_VERSION"),
            environment: state.config.environment.clone(),
        })
        .with_detail("meta", meta()),
    )
}

#[derive(Debug, Serialize)]
pub struct FieldValue {
    field: String,
    value: Value,
}

/// GET /api/app-settings/field/{name} - public fields only
pub async fn get_field(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<Json<ApiResponse<FieldValue>>> {
    let settings = state.settings.get().await?;
    let value = settings.public_field(&name)?;
    Ok(Json(ApiResponse::success(FieldValue { field: name, value })))
}

/// PUT /api/app-settings - partial update
pub async fn update(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Json(payload): Json<AppSettingsUpdate>,
) -> AppResult<Json<ApiResponse<AppSettings>>> {
    payload.validate()?;

    let mut settings = state.settings.get().await?;
    let changes = settings.apply(payload);
    let settings = state
        .settings
        .save(&settings, &grant.current_admin.id)
        .await?;

    tracing::info!(admin_id = %grant.current_admin.id, changes = changes.len(), "Settings updated");
    state.activity.record(
        &grant.current_admin.id,
        ActionType::SettingsUpdate,
        format!("Updated application settings: {}", changes.join(", ")),
        Some(json!({ "changes": changes })),
        &meta,
    );

    Ok(Json(
        ApiResponse::success_with_message("Settings updated successfully", settings)
            .with_detail("meta", json!({ "updatedBy": grant.current_admin.name })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    value: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    field: String,
    old_value: Value,
    new_value: Value,
}

/// PATCH /api/app-settings/field/{name}
pub async fn update_field(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Path(name): Path<String>,
    Json(payload): Json<FieldUpdate>,
) -> AppResult<Json<ApiResponse<FieldChange>>> {
    let value = payload
        .value
        .ok_or_else(|| AppError::with_message(ErrorCode::RequiredField, "Value is required"))?;

    let mut settings = state.settings.get().await?;
    let old_value = settings.set_field(&name, value)?;
    let settings = state
        .settings
        .save(&settings, &grant.current_admin.id)
        .await?;
    let new_value = settings.field(&name)?;

    state.activity.record(
        &grant.current_admin.id,
        ActionType::SettingsUpdate,
        format!("Updated {}: {} → {}", name, old_value, new_value),
        Some(json!({ "field": name })),
        &meta,
    );

    Ok(Json(ApiResponse::success_with_message(
        format!("{} updated successfully", name),
        FieldChange {
            field: name,
            old_value,
            new_value,
        },
    )))
}

/// POST /api/app-settings/toggle/{name} - boolean fields only
pub async fn toggle(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Path(name): Path<String>,
) -> AppResult<Json<ApiResponse<FieldValue>>> {
    let mut settings = state.settings.get().await?;
    let value = settings.toggle(&name)?;
    state
        .settings
        .save(&settings, &grant.current_admin.id)
        .await?;

    state.activity.record(
        &grant.current_admin.id,
        ActionType::SettingsUpdate,
        format!("Toggled {}: {} → {}", name, !value, value),
        Some(json!({ "field": name })),
        &meta,
    );

    Ok(Json(ApiResponse::success_with_message(
        format!("{} toggled successfully", name),
        FieldValue {
            field: name,
            value: Value::Bool(value),
        },
    )))
}

/// POST /api/app-settings/reset
pub async fn reset(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
) -> AppResult<Json<ApiResponse<AppSettings>>> {
    let mut settings = state.settings.get().await?;
    let previous = settings.clone();
    settings.reset();
    let settings = state
        .settings
        .save(&settings, &grant.current_admin.id)
        .await?;

    tracing::info!(admin_id = %grant.current_admin.id, "Settings reset to defaults");
    state.activity.record(
        &grant.current_admin.id,
        ActionType::SettingsUpdate,
        "Reset application settings to defaults",
        Some(json!({ "previousSettings": previous })),
        &meta,
    );

    Ok(Json(
        ApiResponse::success_with_message("Settings reset to defaults", settings)
            .with_detail("meta", json!({ "resetBy": grant.current_admin.name })),
    ))
}
