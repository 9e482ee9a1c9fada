//! Service layer: queue ownership, pairing, and liveness.
//!
//! [`Matchmaker`] serializes every queue mutation, calls the pairing
//! engine after each join, and emits notices through the
//! [`super::domain::Notifier`]. [`LivenessSweeper`] drives periodic
//! eviction of silent participants.

pub mod matchmaker;
pub mod pairing;
pub mod sweeper;

#[cfg(test)]
pub(crate) mod test_support;

pub use matchmaker::Matchmaker;
pub use pairing::{Pairing, try_match};
pub use sweeper::{LivenessSweeper, evict_stale};
