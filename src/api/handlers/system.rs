//! System endpoints: health check and event vocabulary.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::ws::messages::{EventDescriptor, INBOUND_EVENTS, OUTBOUND_EVENTS};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: &'static str,
    /// Participants currently waiting.
    pub queue_size: usize,
    /// Seconds since startup.
    pub uptime_seconds: f64,
}

/// Service description with the event vocabulary.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfoResponse {
    /// Service name.
    pub message: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Path of the WebSocket endpoint.
    pub websocket_path: &'static str,
    /// Events clients may send.
    pub inbound_events: Vec<EventDescriptor>,
    /// Events the broker may send.
    pub outbound_events: Vec<EventDescriptor>,
}

/// `GET /health` — Queue size and uptime.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service status, the number of waiting participants, and uptime in seconds.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let queue_size = state.matchmaker.queue_size().await;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            queue_size,
            uptime_seconds: state.uptime().as_secs_f64(),
        }),
    )
}

/// `GET /` — Service description and event vocabulary.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Event vocabulary",
    description = "Describes the WebSocket endpoint and every inbound and outbound event.",
    responses(
        (status = 200, description = "Service description", body = ServiceInfoResponse),
    )
)]
pub async fn info_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ServiceInfoResponse {
            message: "Matchmaking Broker Server",
            version: env!("CARGO_PKG_VERSION"),
            websocket_path: "/ws",
            inbound_events: INBOUND_EVENTS.to_vec(),
            outbound_events: OUTBOUND_EVENTS.to_vec(),
        }),
    )
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(info_handler))
        .route("/health", get(health_handler))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use tokio::time::Instant;

    use super::*;
    use crate::config::BrokerConfig;
    use crate::domain::{ConnectionId, PeerHandle};

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let Ok(value) = serde_json::from_slice(&bytes) else {
            panic!("body is not json");
        };
        value
    }

    #[tokio::test]
    async fn health_reports_queue_size() {
        let state = AppState::new(&BrokerConfig::default());
        let matchmaker = Arc::clone(&state.matchmaker);
        let _ = matchmaker
            .join(ConnectionId::new(), PeerHandle::new("peerA"), Instant::now())
            .await;

        let response = health_handler(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body.get("status"), Some(&serde_json::json!("ok")));
        assert_eq!(body.get("queueSize"), Some(&serde_json::json!(1)));
        assert!(body.get("uptimeSeconds").and_then(|v| v.as_f64()).is_some());
    }

    #[tokio::test]
    async fn info_lists_vocabulary() {
        let response = info_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body.get("websocketPath"), Some(&serde_json::json!("/ws")));
        let inbound = body
            .get("inboundEvents")
            .and_then(|v| v.as_array())
            .map(Vec::len);
        assert_eq!(inbound, Some(3));
        let outbound = body
            .get("outboundEvents")
            .and_then(|v| v.as_array())
            .map(Vec::len);
        assert_eq!(outbound, Some(5));
    }
}
