//! Per-socket identity, minted by the transport and opaque to the queue.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a live WebSocket: a random UUID v4, unique while the socket
/// is open. Keys the [`super::WaitingQueue`] and addresses every notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Mints a fresh id for a newly accepted socket.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
