//! Event model for the simulation.
//!
//! Events are plain value types: constructed once by the scheduler (or
//! materialized inside a worker for internal time advances) and never mutated
//! afterwards.

mod channel;

pub use channel::{bounded, EventReceiver, EventSender};

/// Discriminates scheduler-produced events from worker-local time advances.
///
/// Only `External` events ever travel over a channel; `Internal` exists so
/// logs and statistics can tag worker-generated activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    External,
    Internal,
}

/// A time-stamped simulation event addressed to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Monotonically assigned by the scheduler, unique within a run.
    pub id: u64,
    pub kind: EventKind,
    /// Virtual time at which the event takes effect.
    pub timestamp: u64,
    pub target_worker: usize,
}

impl Event {
    /// Creates an external event as dispatched by the scheduler.
    #[inline]
    pub fn external(id: u64, timestamp: u64, target_worker: usize) -> Self {
        Self {
            id,
            kind: EventKind::External,
            timestamp,
            target_worker,
        }
    }

    /// Sort key for history ordering.
    #[inline]
    pub fn order_key(&self) -> (u64, u64) {
        (self.timestamp, self.id)
    }
}
