//! Inbound events, already decoded from the transport.

use super::PeerHandle;

/// Something a connection did that the matchmaking service must react to.
///
/// Wire decoding lives in [`crate::ws::messages`]; this type is what the
/// service consumes, so tests can drive it without a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Request to enter the queue. `None` when the client sent no usable
    /// peer handle; the service rejects it.
    Join {
        /// Handle to pass on to the eventual opponent.
        peer_handle: Option<PeerHandle>,
    },
    /// Request to cancel the search.
    Leave,
    /// Liveness signal.
    Heartbeat,
    /// The transport connection closed.
    Disconnect {
        /// Informational only.
        reason: String,
    },
}

impl InboundEvent {
    /// Returns the wire event name, or `"disconnect"` for transport closes.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join_queue",
            Self::Leave => "leave_queue",
            Self::Heartbeat => "heartbeat",
            Self::Disconnect { .. } => "disconnect",
        }
    }
}
