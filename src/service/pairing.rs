//! Pairing engine: turns queue surplus into host/guest matches.

use crate::domain::{Dispatch, Notice, Participant, Role, WaitingQueue};

/// Two participants taken off the queue together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    /// Earlier arrival.
    pub host: Participant,
    /// Later arrival.
    pub guest: Participant,
}

impl Pairing {
    /// Returns the `match_found` notices for both sides. Each side receives
    /// the other's peer handle.
    #[must_use]
    pub fn dispatches(&self) -> [Dispatch; 2] {
        [
            Dispatch::new(
                self.host.connection_id,
                Notice::match_found(Role::Host, self.guest.peer_handle.clone()),
            ),
            Dispatch::new(
                self.guest.connection_id,
                Notice::match_found(Role::Guest, self.host.peer_handle.clone()),
            ),
        ]
    }
}

/// Pairs the two oldest waiting participants, if there are two.
///
/// With fewer than two entries this does nothing, so it is safe to call
/// after every queue mutation.
pub fn try_match(queue: &mut WaitingQueue) -> Option<Pairing> {
    let (host, guest) = queue.take_oldest_pair()?;
    Some(Pairing { host, guest })
}
