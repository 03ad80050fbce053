//! Profile API Module
//!
//! Every route acts on the logged-in admin; authentication is enough.

mod avatar;
mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    // Multipart framing on top of the image itself
    let body_limit = state.config.max_avatar_bytes + 64 * 1024;

    Router::new()
        .route("/api/profile", get(handler::get).put(handler::update))
        .route(
            "/api/profile/avatar",
            post(avatar::upload)
                .delete(avatar::remove)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/profile/password", put(handler::change_password))
        .route("/api/profile/preferences", put(handler::update_preferences))
}
