//! Activity Log API Module (read-only)

mod handler;

use axum::{Router, middleware, routing::get};
use shared::{Action, Module};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/activity-logs", get(handler::list))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission(Module::ActivityLogs, Action::View),
        ))
}
