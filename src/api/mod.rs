//! Read-only HTTP surface: health and event vocabulary.
//!
//! Both endpoints are side-effect free and safe to poll.

pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI description of the HTTP endpoints.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "pairing-broker", description = "Two-player matchmaking broker"),
    paths(handlers::system::health_handler, handlers::system::info_handler),
    components(schemas(
        handlers::system::HealthResponse,
        handlers::system::ServiceInfoResponse,
        crate::ws::messages::EventDescriptor,
    )),
    tags((name = "System", description = "Service status and documentation"))
)]
pub struct ApiDoc;

/// Builds the router with all HTTP endpoints.
pub fn build_router() -> Router<AppState> {
    handlers::routes()
}

/// Swagger UI serving [`ApiDoc`] at `/swagger-ui`.
#[cfg(feature = "swagger-ui")]
pub fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
