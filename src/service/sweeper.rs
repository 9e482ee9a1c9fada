//! Liveness sweeper: bounds how long a silent participant can hold a slot.
//!
//! The eviction rule itself is [`evict_stale`], a plain function over the
//! queue. [`LivenessSweeper`] is the timer that calls
//! [`Matchmaker::sweep`] on a fixed cadence. A participant may survive up to
//! `stale_threshold + sweep_interval` before it is evicted.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::Matchmaker;
use crate::domain::{Participant, WaitingQueue};

/// Removes every entry idle for longer than `threshold` and returns them.
///
/// Entries are removed whether or not their owners can still be notified.
pub fn evict_stale(queue: &mut WaitingQueue, now: Instant, threshold: Duration) -> Vec<Participant> {
    queue
        .stale_entries(now, threshold)
        .into_iter()
        .filter_map(|stale| queue.remove(stale.connection_id))
        .collect()
}

/// Periodic driver for [`Matchmaker::sweep`].
#[derive(Debug)]
pub struct LivenessSweeper {
    matchmaker: Arc<Matchmaker>,
    interval: Duration,
}

impl LivenessSweeper {
    /// Creates a sweeper ticking every `interval`. A zero interval is raised
    /// to one millisecond.
    #[must_use]
    pub fn new(matchmaker: Arc<Matchmaker>, interval: Duration) -> Self {
        Self {
            matchmaker,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Runs one sweep at `now`. Returns the number of evictions.
    pub async fn tick(&self, now: Instant) -> usize {
        self.matchmaker.sweep(now).await.len()
    }

    /// Spawns the sweep loop. It exits once `shutdown` turns `true` or its
    /// sender is dropped.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(
                interval_ms = self.interval.as_millis(),
                threshold_ms = self.matchmaker.stale_threshold().as_millis(),
                "liveness sweeper started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = self.tick(Instant::now()).await;
                        if evicted > 0 {
                            tracing::debug!(evicted, "sweep complete");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::info!("liveness sweeper stopped");
        })
    }
}
