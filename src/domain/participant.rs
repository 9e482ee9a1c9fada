//! Waiting-queue entry: one connection looking for an opponent.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::ConnectionId;

/// Opaque, client-supplied peer identifier.
///
/// Handed to the matched opponent so the two clients can negotiate their
/// own session. The broker never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerHandle(String);

impl PeerHandle {
    /// Wraps a raw handle. Returns `None` for an empty string, which the
    /// broker treats the same as an absent handle.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connection currently holding a slot in the waiting queue.
///
/// Queue position is implicit; `last_seen` is the only thing that ages an
/// entry out, and it never moves backwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Transport connection that owns this slot.
    pub connection_id: ConnectionId,
    /// Handle passed through to the eventual opponent.
    pub peer_handle: PeerHandle,
    last_seen: Instant,
}

impl Participant {
    /// Creates an entry first seen at `now`.
    #[must_use]
    pub const fn new(connection_id: ConnectionId, peer_handle: PeerHandle, now: Instant) -> Self {
        Self {
            connection_id,
            peer_handle,
            last_seen: now,
        }
    }

    #[cfg(test)]
    pub(crate) const fn last_seen(&self) -> Instant {
        self.last_seen
    }

    /// Records a liveness signal. Earlier timestamps are ignored.
    pub fn touch(&mut self, now: Instant) {
        if now > self.last_seen {
            self.last_seen = now;
        }
    }

    /// Time elapsed since the last liveness signal, zero if `now` precedes it.
    #[must_use]
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_seen)
    }

    /// Returns `true` once the participant has been silent for strictly
    /// longer than `threshold`.
    #[must_use]
    pub fn is_stale(&self, now: Instant, threshold: Duration) -> bool {
        self.idle_for(now) > threshold
    }
}
