//! Per-worker statistics, updated only by the owning worker.

/// Counters a worker accumulates over one run and hands back to the
/// coordinator when its channel drains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub id: usize,
    /// External events processed, counting replays.
    pub external_events: u64,
    pub internal_events: u64,
    pub rollbacks: u64,
    pub last_virtual_time: u64,
    /// Every snapshot ever taken, live and replay, not the stack's current
    /// length.
    pub checkpoints_built: u64,
}

impl WorkerStats {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}
