//! WebSocket frame types: inbound envelope, outbound envelope, and the
//! event vocabulary served by `GET /`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{InboundEvent, Notice, PeerHandle};
use crate::error::BrokerError;

/// Inbound envelope: `{"event": "<name>", "data": {...}}`.
///
/// `data` may be omitted for events that carry no fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    /// Event name discriminator.
    pub event: String,
    /// Event-specific payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ClientFrame {
    /// Maps the envelope onto an [`InboundEvent`].
    ///
    /// A `join_queue` without a non-empty string `peerId` still decodes; the
    /// matchmaker rejects it so the client gets the usual error notice.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::UnknownEvent`] for names outside the
    /// vocabulary.
    pub fn into_event(self) -> Result<InboundEvent, BrokerError> {
        match self.event.as_str() {
            "join_queue" => {
                let peer_handle = self
                    .data
                    .get("peerId")
                    .and_then(serde_json::Value::as_str)
                    .and_then(PeerHandle::new);
                Ok(InboundEvent::Join { peer_handle })
            }
            "leave_queue" => Ok(InboundEvent::Leave),
            "heartbeat" => Ok(InboundEvent::Heartbeat),
            other => Err(BrokerError::UnknownEvent(other.to_string())),
        }
    }
}

/// Decodes a text frame into an [`InboundEvent`].
///
/// # Errors
///
/// Returns [`BrokerError::MalformedMessage`] if the frame is not a valid
/// envelope, or [`BrokerError::UnknownEvent`] for an unrecognized name.
pub fn parse_frame(text: &str) -> Result<InboundEvent, BrokerError> {
    serde_json::from_str::<ClientFrame>(text)
        .map_err(BrokerError::MalformedMessage)?
        .into_event()
}

/// Outbound envelope: the notice's `event`/`data` plus a server timestamp.
#[derive(Debug, Serialize)]
pub struct OutboundFrame<'a> {
    /// Notice being sent.
    #[serde(flatten)]
    pub notice: &'a Notice,
    /// Server send time.
    pub timestamp: DateTime<Utc>,
}

impl<'a> OutboundFrame<'a> {
    /// Wraps `notice` with the current time.
    #[must_use]
    pub fn new(notice: &'a Notice) -> Self {
        Self {
            notice,
            timestamp: Utc::now(),
        }
    }

    /// Serializes the frame to JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, BrokerError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One entry of the event vocabulary.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct EventDescriptor {
    /// Wire event name.
    pub name: &'static str,
    /// What the event means.
    pub description: &'static str,
}

/// Events a client may send.
pub const INBOUND_EVENTS: &[EventDescriptor] = &[
    EventDescriptor {
        name: "join_queue",
        description: "Send { peerId } to join matchmaking",
    },
    EventDescriptor {
        name: "leave_queue",
        description: "Leave matchmaking queue",
    },
    EventDescriptor {
        name: "heartbeat",
        description: "Keep a queued search alive",
    },
];

/// Events the broker may send.
pub const OUTBOUND_EVENTS: &[EventDescriptor] = &[
    EventDescriptor {
        name: "queue_update",
        description: "Queue position after joining",
    },
    EventDescriptor {
        name: "match_found",
        description: "Received when match is found: { role, opponentId }",
    },
    EventDescriptor {
        name: "queue_left",
        description: "Confirms a leave_queue request",
    },
    EventDescriptor {
        name: "timeout",
        description: "Search timeout notification",
    },
    EventDescriptor {
        name: "error",
        description: "Request rejected: { code, message }",
    },
];
