//! Simulation runtime: wires the log sink, channels, worker threads and the
//! scheduler together for one run.
//!
//! Ownership does the shutdown work: the scheduler consumes every sender
//! endpoint, so the act of its `run()` returning closes all channels, and
//! each worker exits once it has drained what remains in its buffer.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use tidvarv_config::SimulationConfig;
use tidvarv_core::stats::WorkerStats;
use tidvarv_telemetry::SimLogger;

use crate::error::EngineError;
use crate::scheduler::Scheduler;
use crate::worker::Worker;

/// Outcome of one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Wall-clock time from first thread spawn to last join.
    pub duration: Duration,
    /// External events the scheduler actually pushed.
    pub events_dispatched: usize,
    /// One entry per worker, in worker-id order.
    pub worker_stats: Vec<WorkerStats>,
}

/// Validates the configuration, runs one full simulation and returns the
/// collected statistics.
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationReport, EngineError> {
    let config = config.clone().validated()?;
    let logger = Arc::new(SimLogger::create(&config.log_path)?);

    info!(
        workers = config.num_workers,
        events = config.total_external_events,
        seed = config.seed,
        "starting simulation"
    );
    let started = Instant::now();

    let mut senders = Vec::with_capacity(config.num_workers);
    let mut handles = Vec::with_capacity(config.num_workers);
    for id in 0..config.num_workers {
        let (tx, rx) = tidvarv_core::events::bounded(config.channel_buffer);
        let worker = Worker::new(id, config.clone(), rx, Arc::clone(&logger));
        senders.push(tx);
        handles.push(thread::spawn(move || worker.run()));
    }

    // The scheduler runs on the calling thread and owns the senders; when it
    // returns they are gone and every worker sees end-of-input.
    let scheduler = Scheduler::new(config.clone(), senders, Arc::clone(&logger));
    let events_dispatched = scheduler.run();
    debug!(events_dispatched, "scheduler finished, draining workers");

    let worker_stats: Vec<WorkerStats> = handles
        .into_iter()
        .map(|handle| handle.join().expect("worker thread panicked"))
        .collect();

    logger.flush()?;
    let duration = started.elapsed();
    info!(?duration, events_dispatched, "simulation complete");

    Ok(SimulationReport {
        duration,
        events_dispatched,
        worker_stats,
    })
}
