//! Live connection registry.
//!
//! Maps each [`ConnectionId`] to the bounded channel feeding its WebSocket
//! writer. This is the production [`Notifier`]: delivery is a non-blocking
//! `try_send`, so the matchmaker can call it while holding the queue lock.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{ConnectionId, Dispatch, Notice, Notifier};
use crate::error::BrokerError;

/// Outbound channels for every open WebSocket.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, mpsc::Sender<Notice>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a connection id and its outbound channel of `capacity` notices.
    pub fn register(&self, capacity: usize) -> (ConnectionId, mpsc::Receiver<Notice>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let connection_id = ConnectionId::new();
        self.write().insert(connection_id, sender);
        (connection_id, receiver)
    }

    /// Forgets `connection_id`. Returns `false` if it was not registered.
    pub fn unregister(&self, connection_id: ConnectionId) -> bool {
        self.write().remove(&connection_id).is_some()
    }

    /// Number of open connections, reported in connection logs.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.read().len()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ConnectionId, mpsc::Sender<Notice>>> {
        self.connections.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ConnectionId, mpsc::Sender<Notice>>> {
        self.connections.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for ConnectionRegistry {
    fn deliver(&self, dispatch: Dispatch) -> Result<(), BrokerError> {
        let to = dispatch.to;
        let connections = self.read();
        let Some(sender) = connections.get(&to) else {
            return Err(BrokerError::Unreachable(to));
        };
        sender.try_send(dispatch.notice).map_err(|err| match err {
            TrySendError::Full(_) => BrokerError::OutboundFull(to),
            TrySendError::Closed(_) => BrokerError::Unreachable(to),
        })
    }
}
