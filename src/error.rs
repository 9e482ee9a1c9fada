//! Broker error types with numeric code mapping.
//!
//! [`BrokerError`] is the central error type for the broker. Client-facing
//! variants render the exact text sent back in an `error` notice; the rest
//! are transport or startup failures that only ever reach the logs.

use crate::domain::ConnectionId;

/// Broker error enum with numeric code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | Reaches the client |
/// |-----------|---------------------|--------------------|
/// | 1000–1999 | Validation          | yes                |
/// | 2000–2999 | Queue state         | yes                |
/// | 3000–3999 | Transport / startup | no                 |
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    /// A join request arrived without a usable peer handle.
    #[error("Peer ID is required")]
    MissingPeerHandle,

    /// An inbound frame could not be decoded.
    #[error("Malformed message")]
    MalformedMessage(#[source] serde_json::Error),

    /// An inbound frame named an event the broker does not understand.
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// The connection already holds a slot in the waiting queue.
    #[error("Already in queue")]
    AlreadyQueued(ConnectionId),

    /// No live transport connection is registered under this id.
    #[error("connection {0} is not reachable")]
    Unreachable(ConnectionId),

    /// The connection's outbound buffer is full; the notice was dropped.
    #[error("outbound buffer full for connection {0}")]
    OutboundFull(ConnectionId),

    /// A notice could not be serialized for the wire.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration value is present but unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BrokerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MissingPeerHandle => 1001,
            Self::MalformedMessage(_) => 1002,
            Self::UnknownEvent(_) => 1003,
            Self::AlreadyQueued(_) => 2001,
            Self::Unreachable(_) => 3001,
            Self::OutboundFull(_) => 3002,
            Self::Serialization(_) => 3003,
            Self::InvalidConfig(_) => 3004,
        }
    }

    /// Returns `true` if this error is reported back to the originating
    /// connection as an `error` notice.
    #[must_use]
    pub const fn is_client_facing(&self) -> bool {
        self.error_code() < 3000
    }
}
