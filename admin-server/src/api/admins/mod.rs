//! Admin API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use shared::{Action, Module};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let guard = |action| {
        middleware::from_fn_with_state(state.clone(), require_permission(Module::Admins, action))
    };

    let view = Router::new()
        .route("/api/admins", get(handler::list))
        .route("/api/admins/{id}", get(handler::get_by_id))
        .layer(guard(Action::View));

    let create = Router::new()
        .route("/api/admins", post(handler::create))
        .layer(guard(Action::Create));

    let edit = Router::new()
        .route("/api/admins/{id}", put(handler::update))
        .layer(guard(Action::Edit));

    let remove = Router::new()
        .route("/api/admins/{id}", delete(handler::delete))
        .layer(guard(Action::Delete));

    view.merge(create).merge(edit).merge(remove)
}
