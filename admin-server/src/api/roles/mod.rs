//! Role API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use shared::{Action, Module};

use crate::auth::require_permission;
use crate::core::ServerState;

/// Role router - one permission layer per action
pub fn router(state: &ServerState) -> Router<ServerState> {
    let guard = |action| middleware::from_fn_with_state(state.clone(), require_permission(Module::Roles, action));

    let view = Router::new()
        .route("/api/roles", get(handler::list))
        .route("/api/roles/{id}", get(handler::get_by_id))
        .layer(guard(Action::View));

    let create = Router::new()
        .route("/api/roles", post(handler::create))
        .layer(guard(Action::Create));

    let edit = Router::new()
        .route("/api/roles/{id}", put(handler::update))
        .layer(guard(Action::Edit));

    let delete = Router::new()
        .route("/api/roles/{id}", axum::routing::delete(handler::delete))
        .layer(guard(Action::Delete));

    view.merge(create).merge(edit).merge(delete)
}
