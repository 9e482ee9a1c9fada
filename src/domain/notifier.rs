//! Delivery seam between the matchmaking core and the transport.

use std::fmt::Debug;

use super::Dispatch;
use crate::error::BrokerError;

/// Fire-and-forget delivery of notices to connections.
///
/// Implementations must not block: the matchmaking service calls
/// [`Notifier::deliver`] while it holds the queue lock. A failed delivery is
/// reported back for logging only and never undoes the queue mutation that
/// produced it.
pub trait Notifier: Send + Sync + Debug {
    /// Hands `dispatch` to the recipient's outbound channel.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Unreachable`] if the recipient is no longer
    /// connected, or [`BrokerError::OutboundFull`] if its buffer is full.
    fn deliver(&self, dispatch: Dispatch) -> Result<(), BrokerError>;
}
