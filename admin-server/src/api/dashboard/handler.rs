//! Dashboard Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use serde_json::{Value, json};
use shared::Module;

use crate::auth::AccessGrant;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

fn titled(module: Module) -> String {
    let name = module.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Singular noun for messages ("products" → "Product")
fn singular(module: Module) -> String {
    let title = titled(module);
    title.strip_suffix('s').map(str::to_string).unwrap_or(title)
}

pub async fn list(module: Module) -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success_with_message(
        format!("{} list", titled(module)),
        json!([]),
    ))
}

pub async fn create(module: Module) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse::<()>::ok_with_message(format!("{} created", singular(module)))),
    )
}

pub async fn update(module: Module) -> Json<ApiResponse<()>> {
    Json(ApiResponse::<()>::ok_with_message(format!("{} updated", singular(module))))
}

pub async fn delete(module: Module) -> Json<ApiResponse<()>> {
    Json(ApiResponse::<()>::ok_with_message(format!("{} deleted", singular(module))))
}

pub async fn analytics() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success_with_message("Analytics data", json!({})))
}

pub async fn sales() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success_with_message("Sales analytics", json!({})))
}

pub async fn user_stats() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success_with_message("User analytics", json!({})))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    admins: u64,
    roles: u64,
    pages: u64,
    users: u64,
    activity_logs: u64,
}

/// GET /api/dashboard/summary - record counts
pub async fn summary(
    State(state): State<ServerState>,
    _grant: AccessGrant,
) -> AppResult<Json<ApiResponse<Summary>>> {
    let (admins, roles, pages, users, activity_logs) = tokio::try_join!(
        state.admins.count(),
        state.roles.count(),
        state.pages.count(),
        state.users.count(),
        state.activity_logs.count(),
    )?;
    Ok(Json(ApiResponse::success(Summary {
        admins,
        roles,
        pages,
        users,
        activity_logs,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_labels() {
        assert_eq!(titled(Module::Products), "Products");
        assert_eq!(singular(Module::Orders), "Order");
    }
}
