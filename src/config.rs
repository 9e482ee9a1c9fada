//! Broker configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Missing or unparsable numeric values
//! fall back to their defaults; values that parse but cannot work (a zero
//! sweep interval, a non-IP host, an origin that is not a valid header)
//! are rejected.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;

use crate::error::BrokerError;

/// Default TCP port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default silence allowed before a participant is evicted, in ms.
pub const DEFAULT_STALE_THRESHOLD_MS: u64 = 120_000;
/// Default sweep cadence, in ms.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 10_000;
/// Default per-connection outbound buffer, in notices.
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Origin policy for the HTTP and WebSocket endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigin {
    /// `*`: any origin.
    Any,
    /// A single exact origin.
    Exact(HeaderValue),
}

impl CorsOrigin {
    /// Parses `*` or a single origin.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::InvalidConfig`] if `raw` is not a valid
    /// header value.
    pub fn parse(raw: &str) -> Result<Self, BrokerError> {
        let raw = raw.trim();
        if raw == "*" {
            return Ok(Self::Any);
        }
        HeaderValue::from_str(raw)
            .map(Self::Exact)
            .map_err(|_| BrokerError::InvalidConfig(format!("CORS_ORIGIN is not a valid origin: {raw:?}")))
    }
}

/// Top-level broker configuration.
///
/// Loaded once at startup via [`BrokerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Silence after which a waiting participant is evicted.
    pub stale_threshold: Duration,

    /// How often the liveness sweeper scans the queue.
    pub sweep_interval: Duration,

    /// Origin policy for cross-origin clients.
    pub cors_origin: CorsOrigin,

    /// Capacity of each connection's outbound notice channel.
    pub outbound_buffer: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            stale_threshold: Duration::from_millis(DEFAULT_STALE_THRESHOLD_MS),
            sweep_interval: Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS),
            cors_origin: CorsOrigin::Any,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

impl BrokerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// See [`BrokerConfig::from_lookup`].
    pub fn from_env() -> Result<Self, BrokerError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Recognized keys: `LISTEN_HOST`, `PORT`, `STALE_THRESHOLD_MS`,
    /// `SWEEP_INTERVAL_MS`, `CORS_ORIGIN`, `OUTBOUND_BUFFER`.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::InvalidConfig`] if `LISTEN_HOST` is not an IP
    /// address, `CORS_ORIGIN` is not a valid origin, or `SWEEP_INTERVAL_MS`
    /// or `OUTBOUND_BUFFER` is zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BrokerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("LISTEN_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let ip: IpAddr = host.trim().parse().map_err(|_| {
            BrokerError::InvalidConfig(format!("LISTEN_HOST must be an IP address, got {host:?}"))
        })?;
        let port = parse_var(&lookup, "PORT", DEFAULT_PORT);

        let stale_threshold_ms = parse_var(&lookup, "STALE_THRESHOLD_MS", DEFAULT_STALE_THRESHOLD_MS);
        let sweep_interval_ms = parse_var(&lookup, "SWEEP_INTERVAL_MS", DEFAULT_SWEEP_INTERVAL_MS);
        if sweep_interval_ms == 0 {
            return Err(BrokerError::InvalidConfig(
                "SWEEP_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }

        let outbound_buffer = parse_var(&lookup, "OUTBOUND_BUFFER", DEFAULT_OUTBOUND_BUFFER);
        if outbound_buffer == 0 {
            return Err(BrokerError::InvalidConfig(
                "OUTBOUND_BUFFER must be greater than zero".to_string(),
            ));
        }

        let cors_origin = match lookup("CORS_ORIGIN") {
            Some(raw) => CorsOrigin::parse(&raw)?,
            None => CorsOrigin::Any,
        };

        Ok(Self {
            listen_addr: SocketAddr::new(ip, port),
            stale_threshold: Duration::from_millis(stale_threshold_ms),
            sweep_interval: Duration::from_millis(sweep_interval_ms),
            cors_origin,
            outbound_buffer,
        })
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, "ignoring unparsable config value");
        default
    })
}
