//! Dashboard modules
//!
//! `products` / `orders` / `analytics` are placeholder collections gated per
//! module. `/api/dashboard/summary` needs dashboard.view or analytics.view.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use shared::{Action, Module, Permission};

use crate::auth::{require_any_permission, require_permission};
use crate::core::ServerState;

const SUMMARY_ACCESS: &[Permission] = &[
    Permission::new(Module::Dashboard, Action::View),
    Permission::new(Module::Analytics, Action::View),
];

/// CRUD placeholder router for one module, one permission layer per action
fn placeholder(state: &ServerState, module: Module) -> Router<ServerState> {
    let base = format!("/api/{}", module.as_str());
    let item = format!("{base}/{{id}}");
    let guard = |action| middleware::from_fn_with_state(state.clone(), require_permission(module, action));

    let view = Router::new()
        .route(&base, get(move || handler::list(module)))
        .layer(guard(Action::View));
    let create = Router::new()
        .route(&base, post(move || handler::create(module)))
        .layer(guard(Action::Create));
    let edit = Router::new()
        .route(&item, put(move || handler::update(module)))
        .layer(guard(Action::Edit));
    let delete = Router::new()
        .route(&item, axum::routing::delete(move || handler::delete(module)))
        .layer(guard(Action::Delete));

    view.merge(create).merge(edit).merge(delete)
}

pub fn router(state: &ServerState) -> Router<ServerState> {
    let analytics = Router::new()
        .route("/api/analytics", get(handler::analytics))
        .route("/api/analytics/sales", get(handler::sales))
        .route("/api/analytics/users", get(handler::user_stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission(Module::Analytics, Action::View),
        ));

    let summary = Router::new()
        .route("/api/dashboard/summary", get(handler::summary))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_any_permission(SUMMARY_ACCESS),
        ));

    placeholder(state, Module::Products)
        .merge(placeholder(state, Module::Orders))
        .merge(analytics)
        .merge(summary)
}
