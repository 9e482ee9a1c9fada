//! In-memory [`Notifier`] for service-layer tests.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::domain::{ConnectionId, Dispatch, Notice, Notifier};
use crate::error::BrokerError;

/// Records every delivered dispatch. Connections marked unreachable make
/// delivery fail the way a closed socket would.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    delivered: Mutex<Vec<Dispatch>>,
    unreachable: Mutex<HashSet<ConnectionId>>,
}

impl RecordingNotifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn disconnect(&self, id: ConnectionId) {
        if let Ok(mut set) = self.unreachable.lock() {
            set.insert(id);
        }
    }

    /// Notices delivered to `id`, oldest first.
    pub(crate) fn notices_for(&self, id: ConnectionId) -> Vec<Notice> {
        self.delivered
            .lock()
            .map(|d| {
                d.iter()
                    .filter(|dispatch| dispatch.to == id)
                    .map(|dispatch| dispatch.notice.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn total(&self) -> usize {
        self.delivered.lock().map(|d| d.len()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn deliver(&self, dispatch: Dispatch) -> Result<(), BrokerError> {
        let unreachable = self
            .unreachable
            .lock()
            .map(|set| set.contains(&dispatch.to))
            .unwrap_or(false);
        if unreachable {
            return Err(BrokerError::Unreachable(dispatch.to));
        }
        if let Ok(mut delivered) = self.delivered.lock() {
            delivered.push(dispatch);
        }
        Ok(())
    }
}
