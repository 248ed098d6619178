//! Per-worker event history, ordered by `(timestamp, id)`.
//!
//! The history records every external event a worker has accepted, including
//! stragglers inserted during rollback. It is only ever appended to or
//! spliced into; rollback replays a suffix of it but never shortens it.

use crate::events::Event;

#[derive(Debug, Default)]
pub struct EventHistory {
    entries: Vec<Event>,
}

impl EventHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Splices `event` in at its `(timestamp, id)` position.
    ///
    /// Event ids are unique within a run, so the key never collides.
    pub fn insert(&mut self, event: Event) {
        let position = self
            .entries
            .binary_search_by(|probe| probe.order_key().cmp(&event.order_key()))
            .unwrap_or_else(|insertion_point| insertion_point);
        self.entries.insert(position, event);
        debug_assert!(self.is_ordered());
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.entries
    }

    /// True when every adjacent pair satisfies the `(timestamp, id)` order.
    pub fn is_ordered(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].order_key() < pair[1].order_key())
    }
}
