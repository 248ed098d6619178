//! # tidvarv-core
//!
//! Foundation layer for the tidvarv optimistic simulation engine.
//!
//! Everything a worker owns while it speculates forward lives here: the event
//! model, the bounded scheduler-to-worker channel, the `(timestamp, id)`
//! ordered event history, the checkpoint stack consulted during rollback, and
//! the per-worker statistics record.
//!
//! ### Key submodules:
//! - `events`: event value types and the bounded dispatch channel
//! - `history`: ordered per-worker event history
//! - `checkpoint`: rollback snapshots and the checkpoint stack
//! - `stats`: per-worker counters

pub mod checkpoint;
pub mod events;
pub mod history;
pub mod stats;

pub mod prelude {
    pub use crate::checkpoint::{Checkpoint, CheckpointMode, CheckpointStack, WorkerState};
    pub use crate::events::{Event, EventKind, EventReceiver, EventSender};
    pub use crate::history::EventHistory;
    pub use crate::stats::WorkerStats;
}
