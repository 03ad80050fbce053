//! User API Module (managed end-user accounts)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use shared::{Action, Module};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let guard = |action| middleware::from_fn_with_state(state.clone(), require_permission(Module::Users, action));

    let view = Router::new()
        .route("/api/users", get(handler::list))
        .layer(guard(Action::View));

    let create = Router::new()
        .route("/api/users", post(handler::create))
        .layer(guard(Action::Create));

    let edit = Router::new()
        .route("/api/users/{id}", put(handler::update))
        .layer(guard(Action::Edit));

    let delete = Router::new()
        .route("/api/users/{id}", axum::routing::delete(handler::delete))
        .layer(guard(Action::Delete));

    view.merge(create).merge(edit).merge(delete)
}
