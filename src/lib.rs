//! # pairing-broker
//!
//! Real-time matchmaking broker for two-player sessions.
//!
//! Clients connect over a WebSocket, ask to join the queue with an opaque
//! peer handle, and are paired two at a time in arrival order. Each side
//! receives the other's handle and its role (host or guest); from there the
//! clients talk to each other directly and the broker steps out of the way.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler (ws/)          frame codec, connection registry
//!     ├── Status endpoints (api/)
//!     │
//!     ├── Matchmaker (service/)     owns the queue, serializes mutations
//!     │   ├── Pairing engine
//!     │   └── Liveness sweeper      periodic eviction of silent entries
//!     │
//!     └── WaitingQueue (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod ws;
