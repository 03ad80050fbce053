//! Page Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use shared::models::{
    ActionType, Page, PageCreate, PageReorder, PageStatus, PageUpdate, Seo, Sidebar, slugify,
};
use validator::Validate;

use crate::activity::RequestMeta;
use crate::api::duplicate_as;
use crate::auth::{AccessGrant, CurrentAdmin};
use crate::core::ServerState;
use crate::db::repository::page::{NewPage, PageFilter};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

async fn load(state: &ServerState, id: &str) -> AppResult<Page> {
    state
        .pages
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PageNotFound))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    status: Option<PageStatus>,
    search: Option<String>,
    sidebar_only: Option<bool>,
}

/// GET /api/pages
pub async fn list(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Page>>>> {
    let pages = state
        .pages
        .list(PageFilter {
            status: query.status,
            search: query.search,
            sidebar_only: query.sidebar_only.unwrap_or(false),
        })
        .await?;
    Ok(Json(ApiResponse::success(pages)))
}

/// GET /api/pages/slug/{slug} - published pages only
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<Page>>> {
    let page = state
        .pages
        .find_by_slug(&slug)
        .await?
        .filter(|p| p.status == PageStatus::Published)
        .ok_or_else(|| AppError::new(ErrorCode::PageNotFound))?;
    Ok(Json(ApiResponse::success(page)))
}

/// GET /api/pages/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Page>>> {
    Ok(Json(ApiResponse::success(load(&state, &id).await?)))
}

/// POST /api/pages
pub async fn create(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Json(payload): Json<PageCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Page>>)> {
    payload.validate()?;

    let slug = match payload.slug.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_lowercase(),
        _ => slugify(&payload.title),
    };
    if slug.is_empty() {
        return Err(AppError::validation("Slug cannot be derived from the title"));
    }

    let mut sidebar = Sidebar::default();
    if let Some(patch) = payload.sidebar {
        sidebar.merge(patch);
    }
    let mut seo = Seo::default();
    if let Some(patch) = payload.seo {
        seo.merge(patch);
    }

    let page = state
        .pages
        .create(NewPage {
            title: payload.title,
            slug,
            description: payload.description,
            content: payload.content,
            content_type: payload.content_type.unwrap_or_default(),
            template: payload.template.unwrap_or_default(),
            icon: payload.icon,
            sidebar,
            permissions: payload.permissions.unwrap_or_default(),
            seo,
            status: payload.status.unwrap_or_default(),
            created_by: grant.current_admin.id.clone(),
        })
        .await
        .map_err(duplicate_as(ErrorCode::SlugExists))?;

    tracing::info!(admin_id = %grant.current_admin.id, slug = %page.slug, "Page created");
    state.activity.record(
        &grant.current_admin.id,
        ActionType::PageCreate,
        format!("Created page: {}", page.title),
        Some(json!({ "pageId": page.id })),
        &meta,
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message("Page created successfully", page)),
    ))
}

/// PUT /api/pages/{id}
///
/// `sidebar` and `seo` are merged over the stored values, everything else
/// present in the payload replaces the stored field.
pub async fn update(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Path(id): Path<String>,
    Json(payload): Json<PageUpdate>,
) -> AppResult<Json<ApiResponse<Page>>> {
    payload.validate()?;
    let mut page = load(&state, &id).await?;

    if let Some(title) = payload.title {
        page.title = title.trim().to_string();
    }
    if let Some(slug) = payload.slug.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()) {
        page.slug = slug;
    }
    if payload.description.is_some() {
        page.description = payload.description;
    }
    if let Some(content) = payload.content {
        page.content = content;
    }
    if let Some(content_type) = payload.content_type {
        page.content_type = content_type;
    }
    if let Some(template) = payload.template {
        page.template = template;
    }
    if payload.icon.is_some() {
        page.icon = payload.icon;
    }
    if let Some(patch) = payload.sidebar {
        page.sidebar.merge(patch);
    }
    if let Some(permissions) = payload.permissions {
        page.permissions = permissions;
    }
    if let Some(patch) = payload.seo {
        page.seo.merge(patch);
    }
    if let Some(status) = payload.status {
        page.status = status;
    }
    page.updated_by = Some(grant.current_admin.summary());

    let page = state
        .pages
        .save(&page)
        .await
        .map_err(duplicate_as(ErrorCode::SlugExists))?;

    state.activity.record(
        &grant.current_admin.id,
        ActionType::PageUpdate,
        format!("Updated page: {}", page.title),
        Some(json!({ "pageId": page.id })),
        &meta,
    );

    Ok(Json(ApiResponse::success_with_message("Page updated successfully", page)))
}

/// DELETE /api/pages/{id}
pub async fn delete(
    State(state): State<ServerState>,
    grant: AccessGrant,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let page = load(&state, &id).await?;
    state.pages.delete(&page.id).await?;

    tracing::info!(admin_id = %grant.current_admin.id, slug = %page.slug, "Page deleted");
    state.activity.record(
        &grant.current_admin.id,
        ActionType::PageDelete,
        format!("Deleted page: {}", page.title),
        Some(json!({ "pageId": page.id })),
        &meta,
    );

    Ok(Json(ApiResponse::<()>::ok_with_message("Page deleted successfully")))
}

/// PUT /api/pages/{id}/reorder - sidebar order and/or position
pub async fn reorder(
    State(state): State<ServerState>,
    grant: AccessGrant,
    Path(id): Path<String>,
    Json(payload): Json<PageReorder>,
) -> AppResult<Json<ApiResponse<Page>>> {
    let mut page = load(&state, &id).await?;
    if let Some(order) = payload.order {
        page.sidebar.order = order;
    }
    if let Some(position) = payload.position {
        page.sidebar.position = position;
    }
    page.updated_by = Some(grant.current_admin.summary());

    let page = state.pages.save(&page).await?;
    Ok(Json(ApiResponse::success_with_message("Page order updated", page)))
}
