//! # tidvarv-engine
//!
//! The optimistic (Time Warp-style) simulation core.
//!
//! A [`Scheduler`] produces a finite, monotonically timestamped stream of
//! external events and fans them out over bounded channels to a pool of
//! [`Worker`]s, one OS thread each. Workers advance their local virtual time
//! speculatively; an event older than a worker's LVT (a straggler) triggers a
//! checkpoint rollback and deterministic replay of the affected history
//! suffix. Workers never talk to each other and external events are never
//! withdrawn, so correction stays local to one worker.
//!
//! [`run_simulation`] wires the whole thing together and
//! [`run_speedup_experiment`] reruns one configuration at growing pool
//! widths.

mod error;
mod runtime;
mod scheduler;
mod speedup;
mod worker;

pub use error::EngineError;
pub use runtime::{run_simulation, SimulationReport};
pub use scheduler::Scheduler;
pub use speedup::{run_speedup_experiment, SpeedupReport, SpeedupSample, SPEEDUP_WORKER_COUNTS};
pub use worker::Worker;
