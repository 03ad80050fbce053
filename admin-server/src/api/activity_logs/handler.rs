//! Activity Log Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use shared::models::{ActivityLog, ActivityLogQuery, PageMeta};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/activity-logs?actionType=&admin=&page=&limit=
///
/// Newest first, paginated; `meta` carries `{total, page, limit}`.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ActivityLogQuery>,
) -> AppResult<Json<ApiResponse<Vec<ActivityLog>>>> {
    let (logs, total) = state.activity_logs.query(&query).await?;
    let meta = PageMeta {
        total,
        page: query.page(),
        limit: query.limit(),
    };
    Ok(Json(
        ApiResponse::success(logs).with_detail("meta", serde_json::json!(meta)),
    ))
}
