//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::BrokerConfig;
use crate::domain::Notifier;
use crate::service::Matchmaker;
use crate::ws::ConnectionRegistry;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Owner of the waiting queue.
    pub matchmaker: Arc<Matchmaker>,
    /// Outbound channels of every open WebSocket.
    pub connections: Arc<ConnectionRegistry>,
    /// Per-connection outbound buffer size.
    pub outbound_buffer: usize,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Wires a matchmaker to a fresh connection registry.
    #[must_use]
    pub fn new(config: &BrokerConfig) -> Self {
        let connections = Arc::new(ConnectionRegistry::new());
        let notifier = Arc::clone(&connections) as Arc<dyn Notifier>;
        let matchmaker = Arc::new(Matchmaker::new(notifier, config.stale_threshold));
        Self {
            matchmaker,
            connections,
            outbound_buffer: config.outbound_buffer,
            started_at: Instant::now(),
        }
    }

    /// Time since the state was built.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
