//! Outbound notices addressed to a single connection.
//!
//! Every queue mutation that has a visible outcome produces one or more
//! [`Dispatch`]es. The matchmaking service hands them to a
//! [`super::Notifier`] after mutating the queue, inside the same critical
//! section.

use serde::Serialize;

use super::{ConnectionId, PeerHandle};
use crate::error::BrokerError;

/// Status text sent with every `queue_update`.
pub const SEARCHING_MESSAGE: &str = "Searching for opponent...";
/// Confirmation text sent with `queue_left`.
pub const LEFT_QUEUE_MESSAGE: &str = "Left matchmaking queue";
/// Text sent with `timeout` when the sweeper evicts a participant.
pub const TIMEOUT_MESSAGE: &str = "Search timed out. Please try again.";

/// Side a participant plays in a pairing. Arrival order decides it: the
/// earlier arrival hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// First of the pair to arrive.
    Host,
    /// Second of the pair to arrive.
    Guest,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Guest => "guest",
        }
    }
}

/// Notice sent from the broker to one connection.
///
/// Serializes as `{"event": "<name>", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Notice {
    /// The connection entered the queue.
    QueueUpdate {
        /// 1-based position at the time of joining.
        position: usize,
        /// Human-readable status.
        message: String,
    },

    /// A request from this connection was rejected.
    Error {
        /// Numeric code from [`BrokerError::error_code`].
        code: u32,
        /// Human-readable reason.
        message: String,
    },

    /// The connection was paired with an opponent.
    MatchFound {
        /// Role assigned to the receiving connection.
        role: Role,
        /// Peer handle of the opponent.
        #[serde(rename = "opponentId")]
        opponent_id: PeerHandle,
        /// Human-readable status.
        message: String,
    },

    /// The connection's leave request was processed.
    QueueLeft {
        /// Human-readable status.
        message: String,
    },

    /// The connection was evicted for lack of heartbeats.
    Timeout {
        /// Human-readable status.
        message: String,
    },
}

impl Notice {
    /// Builds a `queue_update` for the given position.
    #[must_use]
    pub fn queue_update(position: usize) -> Self {
        Self::QueueUpdate {
            position,
            message: SEARCHING_MESSAGE.to_string(),
        }
    }

    /// Builds an `error` notice from a rejection.
    #[must_use]
    pub fn rejected(err: &BrokerError) -> Self {
        Self::Error {
            code: err.error_code(),
            message: err.to_string(),
        }
    }

    /// Builds a `match_found` for one side of a pairing.
    #[must_use]
    pub fn match_found(role: Role, opponent_id: PeerHandle) -> Self {
        Self::MatchFound {
            role,
            opponent_id,
            message: format!("Match found! You are the {}.", role.as_str()),
        }
    }

    /// Builds a `queue_left` confirmation.
    #[must_use]
    pub fn queue_left() -> Self {
        Self::QueueLeft {
            message: LEFT_QUEUE_MESSAGE.to_string(),
        }
    }

    /// Builds a `timeout` notice.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Timeout {
            message: TIMEOUT_MESSAGE.to_string(),
        }
    }

    /// Returns the wire event name.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::QueueUpdate { .. } => "queue_update",
            Self::Error { .. } => "error",
            Self::MatchFound { .. } => "match_found",
            Self::QueueLeft { .. } => "queue_left",
            Self::Timeout { .. } => "timeout",
        }
    }
}

/// A notice paired with the connection it is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Recipient connection.
    pub to: ConnectionId,
    /// Notice to deliver.
    pub notice: Notice,
}

impl Dispatch {
    /// Creates a dispatch of `notice` to `to`.
    #[must_use]
    pub const fn new(to: ConnectionId, notice: Notice) -> Self {
        Self { to, notice }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn to_json(notice: &Notice) -> serde_json::Value {
        let Ok(value) = serde_json::to_value(notice) else {
            panic!("serialization failed");
        };
        value
    }

    #[test]
    fn match_found_wire_shape() {
        let Some(opponent) = PeerHandle::new("peerB") else {
            panic!("valid handle");
        };
        let value = to_json(&Notice::match_found(Role::Host, opponent));
        assert_eq!(
            value,
            serde_json::json!({
                "event": "match_found",
                "data": {
                    "role": "host",
                    "opponentId": "peerB",
                    "message": "Match found! You are the host."
                }
            })
        );
    }

    #[test]
    fn queue_update_carries_position() {
        let value = to_json(&Notice::queue_update(2));
        assert_eq!(value.get("event"), Some(&serde_json::json!("queue_update")));
        assert_eq!(
            value.pointer("/data/position"),
            Some(&serde_json::json!(2))
        );
        assert_eq!(
            value.pointer("/data/message"),
            Some(&serde_json::json!(SEARCHING_MESSAGE))
        );
    }

    #[test]
    fn rejected_uses_error_text_and_code() {
        let notice = Notice::rejected(&BrokerError::MissingPeerHandle);
        assert_eq!(
            notice,
            Notice::Error {
                code: 1001,
                message: "Peer ID is required".to_string(),
            }
        );
        assert_eq!(notice.event_name(), "error");
    }

    #[test]
    fn event_names_match_serialized_tags() {
        let notices = [
            Notice::queue_update(1),
            Notice::rejected(&BrokerError::UnknownEvent("x".to_string())),
            Notice::queue_left(),
            Notice::timeout(),
        ];
        for notice in notices {
            let value = to_json(&notice);
            assert_eq!(
                value.get("event").and_then(|v| v.as_str()),
                Some(notice.event_name())
            );
        }
    }
}
