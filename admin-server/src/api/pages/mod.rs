//! Page API Module
//!
//! Listing needs authentication only, `/slug/{slug}` is public (published
//! pages only), everything else checks pages.*.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use shared::{Action, Module};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let guard = |action| middleware::from_fn_with_state(state.clone(), require_permission(Module::Pages, action));

    let open = Router::new()
        .route("/api/pages", get(handler::list))
        .route("/api/pages/slug/{slug}", get(handler::get_by_slug));

    let view = Router::new()
        .route("/api/pages/{id}", get(handler::get_by_id))
        .layer(guard(Action::View));

    let create = Router::new()
        .route("/api/pages", post(handler::create))
        .layer(guard(Action::Create));

    let edit = Router::new()
        .route("/api/pages/{id}", put(handler::update))
        .route("/api/pages/{id}/reorder", put(handler::reorder))
        .layer(guard(Action::Edit));

    let delete = Router::new()
        .route("/api/pages/{id}", axum::routing::delete(handler::delete))
        .layer(guard(Action::Delete));

    open.merge(view).merge(create).merge(edit).merge(delete)
}
