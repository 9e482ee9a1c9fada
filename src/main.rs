//! pairing-broker server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket event channel and the
//! liveness sweeper.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use pairing_broker::app_state::AppState;
use pairing_broker::config::BrokerConfig;
use pairing_broker::server::build_app;
use pairing_broker::service::LivenessSweeper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration
    let config = BrokerConfig::from_env().context("loading configuration")?;
    tracing::info!(
        addr = %config.listen_addr,
        stale_threshold_ms = config.stale_threshold.as_millis(),
        sweep_interval_ms = config.sweep_interval.as_millis(),
        "starting pairing-broker"
    );

    let state = AppState::new(&config);

    // Start the liveness sweeper
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper =
        LivenessSweeper::new(Arc::clone(&state.matchmaker), config.sweep_interval).spawn(shutdown_rx);

    let app = build_app(state, &config.cors_origin);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    let _ = shutdown_tx.send(true);
    if let Err(err) = sweeper.await {
        tracing::warn!(error = %err, "liveness sweeper did not stop cleanly");
    }

    Ok(())
}

/// Installs the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
