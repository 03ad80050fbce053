//! Router assembly
//!
//! [`build_router`] only registers routes. [`build_app`] adds the middleware
//! stack and is shared by the HTTP server and the oneshot integration tests.

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::ServerState;
use crate::middleware;

const REQUEST_ID: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All API routes, each module carrying its own permission layers
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Public
        .merge(api::health::router())
        .merge(api::auth::router())
        // Authentication only
        .merge(api::profile::router(state))
        // Permission matrix
        .merge(api::roles::router(state))
        .merge(api::admins::router(state))
        .merge(api::app_settings::router(state))
        .merge(api::pages::router(state))
        .merge(api::activity_logs::router(state))
        .merge(api::users::router(state))
        .merge(api::dashboard::router(state))
}

/// Router plus middleware stack and the `/uploads` file service
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router(state)
        .nest_service("/uploads", ServeDir::new(state.config.uploads_dir()))
        // JWT auth - innermost global layer, injects CurrentAdmin
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .layer(TraceLayer::new_for_http())
        // Request logging - reads AuthenticatedAs from response extensions
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID)))
        // Request ID - outside the logging layer so logs match the response header
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID),
            XRequestId,
        ))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
