//! Arrival-ordered waiting queue.
//!
//! [`WaitingQueue`] is a plain, synchronous FIFO of [`Participant`]s keyed by
//! [`ConnectionId`]. It performs no locking and no I/O; the matchmaking
//! service owns the single instance behind a mutex and serializes every
//! mutation through it.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

use super::{ConnectionId, PeerHandle, Participant};
use crate::error::BrokerError;

/// Ordered list of participants waiting for an opponent.
///
/// # Invariants
///
/// - A connection id appears at most once.
/// - Entries leave in arrival order; the front two are always the next pair.
/// - Removal of an absent id is a no-op, never an error.
#[derive(Debug, Default)]
pub struct WaitingQueue {
    entries: VecDeque<Participant>,
}

impl WaitingQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a participant seen at `now`.
    ///
    /// Returns the queue length after insertion, which is also the new
    /// entry's 1-based position.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::AlreadyQueued`] if `connection_id` already
    /// holds a slot. The existing entry is left untouched.
    pub fn enqueue(
        &mut self,
        connection_id: ConnectionId,
        peer_handle: PeerHandle,
        now: Instant,
    ) -> Result<usize, BrokerError> {
        if self.contains(connection_id) {
            return Err(BrokerError::AlreadyQueued(connection_id));
        }
        self.entries
            .push_back(Participant::new(connection_id, peer_handle, now));
        Ok(self.entries.len())
    }

    /// Removes the entry for `connection_id`, returning it if it was present.
    pub fn remove(&mut self, connection_id: ConnectionId) -> Option<Participant> {
        let index = self
            .entries
            .iter()
            .position(|p| p.connection_id == connection_id)?;
        self.entries.remove(index)
    }

    /// Updates `last_seen` for `connection_id`. Returns `false` if the id is
    /// not queued (a late heartbeat after pairing or expiry).
    pub fn refresh(&mut self, connection_id: ConnectionId, now: Instant) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|p| p.connection_id == connection_id)
        {
            Some(participant) => {
                participant.touch(now);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the two oldest entries as `(first, second)`.
    ///
    /// Returns `None` and leaves the queue untouched when fewer than two
    /// entries are waiting.
    pub fn take_oldest_pair(&mut self) -> Option<(Participant, Participant)> {
        if self.entries.len() < 2 {
            return None;
        }
        let first = self.entries.pop_front()?;
        let second = self.entries.pop_front()?;
        Some((first, second))
    }

    /// Returns copies of every entry silent for longer than `threshold`.
    /// Nothing is removed.
    #[must_use]
    pub fn stale_entries(&self, now: Instant, threshold: Duration) -> Vec<Participant> {
        self.entries
            .iter()
            .filter(|p| p.is_stale(now, threshold))
            .cloned()
            .collect()
    }

    /// Returns `true` if `connection_id` currently holds a slot.
    #[must_use]
    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.get(connection_id).is_some()
    }

    /// Returns the entry for `connection_id`, if queued.
    #[must_use]
    pub fn get(&self, connection_id: ConnectionId) -> Option<&Participant> {
        self.entries.iter().find(|p| p.connection_id == connection_id)
    }

    /// Returns the number of waiting participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nobody is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
