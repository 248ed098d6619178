//! Rollback snapshots and the per-worker checkpoint stack.
//!
//! A checkpoint pairs a copy of the worker state with the history length at
//! the moment it was taken. The stack grows while the worker runs forward and
//! is truncated only when a rollback restores an older snapshot.

use serde::Serialize;

/// The part of a worker that must survive a rollback.
///
/// Any field added here is captured wholesale by every checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkerState {
    /// Local virtual time.
    pub lvt: u64,
}

/// State snapshot plus the number of history entries present when it was
/// taken. Replay starts at `history_len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub state: WorkerState,
    pub history_len: usize,
}

/// Whether a snapshot was taken on the live path or while replaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointMode {
    Live,
    Replay,
}

/// Append-mostly stack of checkpoints with non-decreasing LVTs.
#[derive(Debug)]
pub struct CheckpointStack {
    entries: Vec<Checkpoint>,
}

impl CheckpointStack {
    /// Starts with the initial `(lvt = 0, history_len = 0)` snapshot, so a
    /// rollback target always exists.
    pub fn new() -> Self {
        Self {
            entries: vec![Checkpoint {
                state: WorkerState::default(),
                history_len: 0,
            }],
        }
    }

    pub fn push(&mut self, checkpoint: Checkpoint) {
        self.entries.push(checkpoint);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Checkpoint {
        self.entries[index]
    }

    /// Index of the latest checkpoint whose LVT is at most `timestamp`,
    /// falling back to the initial checkpoint.
    pub fn latest_at_or_before(&self, timestamp: u64) -> usize {
        self.entries
            .iter()
            .rposition(|checkpoint| checkpoint.state.lvt <= timestamp)
            .unwrap_or(0)
    }

    /// Drops every checkpoint above `index`, keeping `index` itself.
    pub fn truncate_to(&mut self, index: usize) {
        self.entries.truncate(index + 1);
    }

    /// True when LVTs and history lengths are non-decreasing along the stack.
    pub fn is_monotonic(&self) -> bool {
        self.entries.windows(2).all(|pair| {
            pair[0].state.lvt <= pair[1].state.lvt && pair[0].history_len <= pair[1].history_len
        })
    }
}

impl Default for CheckpointStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoint(lvt: u64, history_len: usize) -> Checkpoint {
        Checkpoint {
            state: WorkerState { lvt },
            history_len,
        }
    }

    #[test]
    fn starts_with_initial_snapshot() {
        let stack = CheckpointStack::new();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.get(0).state.lvt, 0);
        assert_eq!(stack.get(0).history_len, 0);
    }

    #[test]
    fn selects_latest_checkpoint_at_or_before_timestamp() {
        let mut stack = CheckpointStack::new();
        stack.push(checkpoint(4, 1));
        stack.push(checkpoint(9, 2));
        stack.push(checkpoint(15, 3));
        assert_eq!(stack.latest_at_or_before(10), 2);
        assert_eq!(stack.latest_at_or_before(9), 2);
        assert_eq!(stack.latest_at_or_before(100), 3);
    }

    #[test]
    fn falls_back_to_initial_checkpoint() {
        let mut stack = CheckpointStack::new();
        stack.push(checkpoint(4, 1));
        // Every non-initial snapshot is newer than the target time; index 0
        // still qualifies because its LVT is zero.
        assert_eq!(stack.latest_at_or_before(0), 0);
    }

    #[test]
    fn truncate_keeps_the_target() {
        let mut stack = CheckpointStack::new();
        stack.push(checkpoint(4, 1));
        stack.push(checkpoint(9, 2));
        stack.truncate_to(1);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.get(1).state.lvt, 4);
    }

    #[test]
    fn forward_execution_keeps_the_stack_monotonic() {
        let mut stack = CheckpointStack::new();
        stack.push(checkpoint(4, 1));
        stack.push(checkpoint(4, 2));
        stack.push(checkpoint(12, 3));
        assert!(stack.is_monotonic());
    }
}
