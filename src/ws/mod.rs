//! WebSocket layer: connection handling, frame codec, connection registry.
//!
//! The WebSocket endpoint at `/ws` is the transport for the matchmaking
//! event vocabulary. Each socket gets a [`registry::ConnectionRegistry`]
//! entry whose channel carries notices addressed to it.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod registry;

pub use registry::ConnectionRegistry;
