//! Domain layer: participant identity, the waiting queue, and the event
//! vocabulary.
//!
//! Everything here is synchronous and transport-agnostic. The queue is a
//! plain data structure; locking and dispatch are the service layer's job.

pub mod connection_id;
pub mod inbound;
pub mod notice;
pub mod notifier;
pub mod participant;
pub mod waiting_queue;

pub use connection_id::ConnectionId;
pub use inbound::InboundEvent;
pub use notice::{Dispatch, Notice, Role};
pub use notifier::Notifier;
pub use participant::{Participant, PeerHandle};
pub use waiting_queue::WaitingQueue;
