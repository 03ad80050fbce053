//! App Settings API Module
//!
//! | Path | Method | Permission |
//! |------|--------|------------|
//! | /api/app-settings | GET | optional (anonymous gets the public subset) |
//! | /api/app-settings/public, /version, /field/{name} | GET | public |
//! | /api/app-settings | PUT | settings.edit |
//! | /api/app-settings/field/{name} | PATCH | settings.edit |
//! | /api/app-settings/toggle/{name}, /reset | POST | settings.edit |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};
use shared::{Action, Module};

use crate::auth::{optional_grant, require_permission};
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let optional = Router::new()
        .route("/api/app-settings", get(handler::get_settings))
        .layer(middleware::from_fn_with_state(state.clone(), optional_grant));

    let public = Router::new()
        .route("/api/app-settings/public", get(handler::get_public))
        .route("/api/app-settings/version", get(handler::version))
        .route("/api/app-settings/field/{name}", get(handler::get_field));

    let edit = Router::new()
        .route("/api/app-settings", put(handler::update))
        .route("/api/app-settings/field/{name}", patch(handler::update_field))
        .route("/api/app-settings/toggle/{name}", post(handler::toggle))
        .route("/api/app-settings/reset", post(handler::reset))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission(Module::Settings, Action::Edit),
        ));

    optional.merge(public).merge(edit)
}
