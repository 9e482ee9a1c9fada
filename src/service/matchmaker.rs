//! Matchmaking service: the single owner of the waiting queue.
//!
//! Translates inbound events into queue operations and hands the resulting
//! notices to the [`Notifier`]. Every operation runs under one async mutex,
//! and notices go out before the lock is released, so no caller ever sees a
//! queue that still lists a participant whose outcome was already announced.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{pairing, sweeper};
use crate::domain::{
    ConnectionId, Dispatch, InboundEvent, Notice, Notifier, PeerHandle, WaitingQueue,
};
use crate::error::BrokerError;

/// Owner of the waiting queue and entry point for every state change.
///
/// Shared between WebSocket connections and the liveness sweeper behind an
/// [`Arc`]. Every mutation method follows the pattern: acquire lock → mutate
/// queue → deliver notices → release lock.
#[derive(Debug)]
pub struct Matchmaker {
    queue: Mutex<WaitingQueue>,
    notifier: Arc<dyn Notifier>,
    stale_threshold: Duration,
}

impl Matchmaker {
    /// Creates a matchmaker with an empty queue.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, stale_threshold: Duration) -> Self {
        Self {
            queue: Mutex::new(WaitingQueue::new()),
            notifier,
            stale_threshold,
        }
    }

    /// Applies one inbound event received at `now`.
    ///
    /// Rejections are reported to the originating connection as `error`
    /// notices; nothing is returned to the transport.
    pub async fn handle(&self, connection_id: ConnectionId, event: InboundEvent, now: Instant) {
        match event {
            InboundEvent::Join { peer_handle } => {
                let _ = self.join(connection_id, peer_handle, now).await;
            }
            InboundEvent::Leave => self.leave(connection_id).await,
            InboundEvent::Heartbeat => self.heartbeat(connection_id, now).await,
            InboundEvent::Disconnect { reason } => self.disconnect(connection_id, &reason).await,
        }
    }

    /// Puts `connection_id` in the queue and pairs eagerly.
    ///
    /// On success the caller receives `queue_update` with its position,
    /// followed by `match_found` if an opponent was already waiting.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::MissingPeerHandle`] without a handle, or
    /// [`BrokerError::AlreadyQueued`] if the connection is already waiting.
    /// Either way the connection also receives an `error` notice.
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        peer_handle: Option<PeerHandle>,
        now: Instant,
    ) -> Result<usize, BrokerError> {
        let Some(peer_handle) = peer_handle else {
            let err = BrokerError::MissingPeerHandle;
            self.reject(connection_id, &err);
            return Err(err);
        };

        let mut queue = self.queue.lock().await;
        let position = match queue.enqueue(connection_id, peer_handle.clone(), now) {
            Ok(position) => position,
            Err(err) => {
                self.reject(connection_id, &err);
                return Err(err);
            }
        };

        tracing::info!(%connection_id, %peer_handle, queue_size = position, "participant joined queue");
        self.deliver(Dispatch::new(connection_id, Notice::queue_update(position)));

        if let Some(pairing) = pairing::try_match(&mut queue) {
            tracing::info!(
                host = %pairing.host.connection_id,
                guest = %pairing.guest.connection_id,
                host_peer = %pairing.host.peer_handle,
                guest_peer = %pairing.guest.peer_handle,
                queue_size = queue.len(),
                "participants paired"
            );
            for dispatch in pairing.dispatches() {
                self.deliver(dispatch);
            }
        }

        Ok(position)
    }

    /// Cancels the search for `connection_id`. Always confirms with
    /// `queue_left`, whether or not the connection was waiting.
    pub async fn leave(&self, connection_id: ConnectionId) {
        let mut queue = self.queue.lock().await;
        if queue.remove(connection_id).is_some() {
            tracing::info!(%connection_id, queue_size = queue.len(), "participant left queue");
        }
        self.deliver(Dispatch::new(connection_id, Notice::queue_left()));
    }

    /// Records a liveness signal. Silently ignored for connections that are
    /// not waiting.
    pub async fn heartbeat(&self, connection_id: ConnectionId, now: Instant) {
        let refreshed = self.queue.lock().await.refresh(connection_id, now);
        tracing::trace!(%connection_id, refreshed, "heartbeat");
    }

    /// Drops `connection_id` from the queue after its transport closed.
    pub async fn disconnect(&self, connection_id: ConnectionId, reason: &str) {
        let mut queue = self.queue.lock().await;
        tracing::info!(%connection_id, reason, "connection closed");
        if queue.remove(connection_id).is_some() {
            tracing::info!(%connection_id, queue_size = queue.len(), "participant removed from queue");
        }
    }

    /// Evicts every participant idle for longer than the stale threshold
    /// and sends each a `timeout` notice if it is still reachable.
    ///
    /// Returns the evicted connection ids.
    pub async fn sweep(&self, now: Instant) -> Vec<ConnectionId> {
        let mut queue = self.queue.lock().await;
        let evicted = sweeper::evict_stale(&mut queue, now, self.stale_threshold);

        for participant in &evicted {
            tracing::info!(
                connection_id = %participant.connection_id,
                idle_ms = participant.idle_for(now).as_millis(),
                queue_size = queue.len(),
                "removing expired participant"
            );
            self.deliver(Dispatch::new(participant.connection_id, Notice::timeout()));
        }

        evicted.into_iter().map(|p| p.connection_id).collect()
    }

    /// Reports a rejected request back to the connection that sent it.
    /// Transport and configuration errors are logged but never sent.
    pub fn reject(&self, connection_id: ConnectionId, err: &BrokerError) {
        if !err.is_client_facing() {
            tracing::warn!(%connection_id, code = err.error_code(), error = %err, "internal error withheld from client");
            return;
        }
        tracing::debug!(%connection_id, code = err.error_code(), error = %err, "request rejected");
        self.deliver(Dispatch::new(connection_id, Notice::rejected(err)));
    }

    /// Returns the number of waiting participants.
    pub async fn queue_size(&self) -> usize {
        self.queue.lock().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_queued(&self, connection_id: ConnectionId) -> bool {
        self.queue.lock().await.contains(connection_id)
    }

    /// Returns the configured stale threshold.
    #[must_use]
    pub const fn stale_threshold(&self) -> Duration {
        self.stale_threshold
    }

    fn deliver(&self, dispatch: Dispatch) {
        let to = dispatch.to;
        let event = dispatch.notice.event_name();
        match self.notifier.deliver(dispatch) {
            Ok(()) => {}
            Err(err @ BrokerError::Unreachable(_)) => {
                tracing::debug!(connection_id = %to, event, error = %err, "notice not delivered");
            }
            Err(err) => {
                tracing::warn!(connection_id = %to, event, error = %err, "notice dropped");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::domain::Role;
    use crate::service::test_support::RecordingNotifier;

    const THRESHOLD: Duration = Duration::from_millis(120_000);

    fn make_matchmaker() -> (Matchmaker, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let matchmaker = Matchmaker::new(Arc::clone(&notifier) as Arc<dyn Notifier>, THRESHOLD);
        (matchmaker, notifier)
    }

    fn handle(raw: &str) -> Option<PeerHandle> {
        PeerHandle::new(raw)
    }

    fn opponent_of(notice: &Notice) -> (Role, String) {
        let Notice::MatchFound {
            role, opponent_id, ..
        } = notice
        else {
            panic!("expected match_found, got {notice:?}");
        };
        (*role, opponent_id.as_str().to_string())
    }

    #[tokio::test]
    async fn two_joins_produce_host_and_guest() {
        let (matchmaker, notifier) = make_matchmaker();
        let now = Instant::now();
        let conn1 = ConnectionId::new();
        let conn2 = ConnectionId::new();

        assert_eq!(assert_ok!(matchmaker.join(conn1, handle("peerA"), now).await), 1);
        assert_eq!(assert_ok!(matchmaker.join(conn2, handle("peerB"), now).await), 2);

        let to_conn1 = notifier.notices_for(conn1);
        assert_eq!(to_conn1.len(), 2);
        assert_eq!(to_conn1.first(), Some(&Notice::queue_update(1)));
        let Some(last) = to_conn1.last() else {
            panic!("missing match notice");
        };
        assert_eq!(opponent_of(last), (Role::Host, "peerB".to_string()));

        let to_conn2 = notifier.notices_for(conn2);
        assert_eq!(to_conn2.first(), Some(&Notice::queue_update(2)));
        let Some(last) = to_conn2.last() else {
            panic!("missing match notice");
        };
        assert_eq!(opponent_of(last), (Role::Guest, "peerA".to_string()));

        assert_eq!(matchmaker.queue_size().await, 0);
    }

    #[tokio::test]
    async fn duplicate_join_is_rejected() {
        let (matchmaker, notifier) = make_matchmaker();
        let now = Instant::now();
        let conn1 = ConnectionId::new();

        assert_ok!(matchmaker.join(conn1, handle("peerA"), now).await);
        let err = assert_err!(matchmaker.join(conn1, handle("peerA"), now).await);
        assert!(matches!(err, BrokerError::AlreadyQueued(id) if id == conn1));

        assert_eq!(matchmaker.queue_size().await, 1);
        assert_eq!(
            notifier.notices_for(conn1).last(),
            Some(&Notice::Error {
                code: 2001,
                message: "Already in queue".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn join_without_peer_handle_is_rejected() {
        let (matchmaker, notifier) = make_matchmaker();
        let conn = ConnectionId::new();

        let err = assert_err!(matchmaker.join(conn, None, Instant::now()).await);
        assert!(matches!(err, BrokerError::MissingPeerHandle));
        assert_eq!(matchmaker.queue_size().await, 0);
        assert_eq!(
            notifier.notices_for(conn),
            vec![Notice::Error {
                code: 1001,
                message: "Peer ID is required".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn leave_confirms_even_when_not_queued() {
        let (matchmaker, notifier) = make_matchmaker();
        let conn = ConnectionId::new();

        matchmaker.leave(conn).await;
        assert_eq!(notifier.notices_for(conn), vec![Notice::queue_left()]);

        assert_ok!(matchmaker.join(conn, handle("peerA"), Instant::now()).await);
        matchmaker.leave(conn).await;
        assert!(!matchmaker.is_queued(conn).await);
        assert_eq!(notifier.notices_for(conn).last(), Some(&Notice::queue_left()));
    }

    #[tokio::test]
    async fn disconnect_removes_silently() {
        let (matchmaker, notifier) = make_matchmaker();
        let conn = ConnectionId::new();
        assert_ok!(matchmaker.join(conn, handle("peerA"), Instant::now()).await);
        let before = notifier.total();

        matchmaker.disconnect(conn, "transport close").await;
        matchmaker.disconnect(conn, "transport close").await;

        assert_eq!(matchmaker.queue_size().await, 0);
        assert_eq!(notifier.total(), before);
    }

    #[tokio::test]
    async fn rejoin_after_leave_goes_to_back() {
        let (matchmaker, notifier) = make_matchmaker();
        let now = Instant::now();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        let c = ConnectionId::new();

        assert_ok!(matchmaker.join(a, handle("peerA"), now).await);
        matchmaker.leave(a).await;
        assert_ok!(matchmaker.join(b, handle("peerB"), now).await);
        assert_ok!(matchmaker.join(a, handle("peerA"), now).await);
        assert_ok!(matchmaker.join(c, handle("peerC"), now).await);

        let Some(last) = notifier.notices_for(b).last().cloned() else {
            panic!("b got nothing");
        };
        assert_eq!(opponent_of(&last), (Role::Host, "peerA".to_string()));
        assert!(matchmaker.is_queued(c).await);
    }

    #[tokio::test]
    async fn sweep_evicts_and_notifies() {
        let (matchmaker, notifier) = make_matchmaker();
        let t0 = Instant::now();
        let conn = ConnectionId::new();
        assert_ok!(matchmaker.join(conn, handle("peerA"), t0).await);

        assert!(matchmaker.sweep(t0 + THRESHOLD).await.is_empty());

        let evicted = matchmaker.sweep(t0 + THRESHOLD + Duration::from_millis(1)).await;
        assert_eq!(evicted, vec![conn]);
        assert_eq!(matchmaker.queue_size().await, 0);
        assert_eq!(notifier.notices_for(conn).last(), Some(&Notice::timeout()));
    }

    #[tokio::test]
    async fn heartbeat_defers_eviction() {
        let (matchmaker, _notifier) = make_matchmaker();
        let t0 = Instant::now();
        let conn = ConnectionId::new();
        assert_ok!(matchmaker.join(conn, handle("peerA"), t0).await);

        matchmaker.heartbeat(conn, t0 + Duration::from_secs(100)).await;
        assert!(matchmaker.sweep(t0 + Duration::from_secs(200)).await.is_empty());
        assert_eq!(
            matchmaker.sweep(t0 + Duration::from_secs(221)).await,
            vec![conn]
        );
    }

    #[tokio::test]
    async fn sweep_removes_unreachable_participants() {
        let (matchmaker, notifier) = make_matchmaker();
        let t0 = Instant::now();
        let gone = ConnectionId::new();
        assert_ok!(matchmaker.join(gone, handle("peerA"), t0).await);
        notifier.disconnect(gone);

        let evicted = matchmaker.sweep(t0 + THRESHOLD * 2).await;
        assert_eq!(evicted, vec![gone]);
        assert_eq!(matchmaker.queue_size().await, 0);
    }

    #[tokio::test]
    async fn late_heartbeat_after_pairing_is_ignored() {
        let (matchmaker, _notifier) = make_matchmaker();
        let now = Instant::now();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        assert_ok!(matchmaker.join(a, handle("peerA"), now).await);
        assert_ok!(matchmaker.join(b, handle("peerB"), now).await);

        matchmaker.heartbeat(a, now).await;
        matchmaker.disconnect(b, "client close").await;
        assert_eq!(matchmaker.queue_size().await, 0);
    }

    #[test]
    fn only_client_facing_errors_are_reported() {
        let (matchmaker, notifier) = make_matchmaker();
        let conn = ConnectionId::new();

        matchmaker.reject(conn, &BrokerError::OutboundFull(conn));
        matchmaker.reject(conn, &BrokerError::InvalidConfig("PORT".to_string()));
        assert_eq!(notifier.total(), 0);

        matchmaker.reject(conn, &BrokerError::UnknownEvent("dance".to_string()));
        assert_eq!(
            notifier.notices_for(conn),
            vec![Notice::Error {
                code: 1003,
                message: "Unknown event: dance".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn handle_routes_each_event() {
        let (matchmaker, notifier) = make_matchmaker();
        let now = Instant::now();
        let conn = ConnectionId::new();

        matchmaker
            .handle(conn, InboundEvent::Join { peer_handle: handle("peerA") }, now)
            .await;
        assert!(matchmaker.is_queued(conn).await);

        matchmaker.handle(conn, InboundEvent::Heartbeat, now).await;
        matchmaker.handle(conn, InboundEvent::Leave, now).await;
        assert!(!matchmaker.is_queued(conn).await);

        matchmaker
            .handle(conn, InboundEvent::Join { peer_handle: None }, now)
            .await;
        matchmaker
            .handle(
                conn,
                InboundEvent::Disconnect {
                    reason: "client close".to_string(),
                },
                now,
            )
            .await;

        let events: Vec<&'static str> = notifier
            .notices_for(conn)
            .iter()
            .map(Notice::event_name)
            .collect();
        assert_eq!(events, vec!["queue_update", "queue_left", "error"]);
    }
}
