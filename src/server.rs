//! Router assembly shared by the binary and the integration tests.

use axum::Router;
use axum::http::Method;
use axum::routing::get;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::CorsOrigin;
use crate::ws::handler::ws_handler;

/// Builds the full application: HTTP endpoints, `/ws`, tracing and CORS.
pub fn build_app(state: AppState, cors_origin: &CorsOrigin) -> Router {
    let router = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(api::swagger_ui());

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

/// CORS policy allowing `GET` and `POST` from the configured origin.
#[must_use]
pub fn cors_layer(origin: &CorsOrigin) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods([Method::GET, Method::POST]);
    match origin {
        CorsOrigin::Any => layer.allow_origin(cors::Any),
        CorsOrigin::Exact(value) => layer.allow_origin(value.clone()),
    }
}
