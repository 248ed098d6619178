//! Worker state machine: speculative forward execution with checkpointed
//! rollback.
//!
//! A worker owns everything it touches (LVT, event history, checkpoint
//! stack, RNG, statistics) and shares only the log sink. It processes
//! external events in arrival order but stores them in `(timestamp, id)`
//! order, so a rollback can replay the affected suffix deterministically.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use tidvarv_config::SimulationConfig;
use tidvarv_core::checkpoint::{Checkpoint, CheckpointMode, CheckpointStack, WorkerState};
use tidvarv_core::events::{Event, EventReceiver};
use tidvarv_core::history::EventHistory;
use tidvarv_core::stats::WorkerStats;
use tidvarv_telemetry::{Entity, LogPayload, LogRecord, SimLogger};

pub struct Worker {
    id: usize,
    config: SimulationConfig,
    input: EventReceiver,
    logger: Arc<SimLogger>,
    rng: StdRng,
    state: WorkerState,
    history: EventHistory,
    checkpoints: CheckpointStack,
    stats: WorkerStats,
}

impl Worker {
    /// Builds a worker seeded from `config.seed + id * 17 + 99`. The seed
    /// derivation is part of the observable behavior and must not change.
    pub fn new(
        id: usize,
        config: SimulationConfig,
        input: EventReceiver,
        logger: Arc<SimLogger>,
    ) -> Self {
        let seed = config
            .seed
            .wrapping_add((id as i64).wrapping_mul(17))
            .wrapping_add(99) as u64;
        Self {
            id,
            config,
            input,
            logger,
            rng: StdRng::seed_from_u64(seed),
            state: WorkerState::default(),
            history: EventHistory::new(),
            checkpoints: CheckpointStack::new(),
            stats: WorkerStats::new(id),
        }
    }

    /// Consumes events until the input channel is closed and drained, then
    /// reports the final statistics.
    pub fn run(mut self) -> WorkerStats {
        while let Some(event) = self.input.recv() {
            self.handle_external(event);
        }
        self.log(LogPayload::WorkerStopped { worker_id: self.id });
        self.stats
    }

    fn handle_external(&mut self, event: Event) {
        self.log(LogPayload::ExternalReceived {
            worker_id: self.id,
            event_id: event.id,
            event_timestamp: event.timestamp,
        });

        // Snapshot the pre-processing state. Taken before the straggler
        // check so the rollback path has an anchor at the current LVT; the
        // arriving event is not yet in the history it counts.
        self.take_checkpoint(self.history.len(), CheckpointMode::Live);

        if event.timestamp < self.state.lvt {
            trace!(
                worker = self.id,
                event = event.id,
                lvt = self.state.lvt,
                timestamp = event.timestamp,
                "straggler"
            );
            self.log(LogPayload::StragglerDetected {
                worker_id: self.id,
                event_id: event.id,
                event_timestamp: event.timestamp,
            });
            self.roll_back(event);
            return;
        }

        self.history.insert(event);
        self.process_external(event, false);
    }

    /// Applies one external event: jump LVT to its timestamp, then let it
    /// spawn internal events. Used on the live path and during replay.
    fn process_external(&mut self, event: Event, from_replay: bool) {
        let previous_lvt = self.state.lvt;
        self.state.lvt = event.timestamp;
        self.stats.external_events += 1;
        self.log(LogPayload::ExternalProcessed {
            worker_id: self.id,
            event_id: event.id,
            from_replay,
            previous_lvt,
        });
        self.generate_internal_events();
        self.stats.last_virtual_time = self.state.lvt;
    }

    /// Advances LVT by a sampled number of internal jumps, clamped at the
    /// virtual-time ceiling. The logged jump is the applied one, which may be
    /// smaller than sampled when clamping hits.
    fn generate_internal_events(&mut self) {
        let count = self
            .rng
            .gen_range(self.config.internal_min_events..=self.config.internal_max_events);
        for _ in 0..count {
            if self.state.lvt >= self.config.max_virtual_time {
                return;
            }
            let jump = self
                .rng
                .gen_range(self.config.internal_min_jump..=self.config.internal_max_jump);
            let previous_lvt = self.state.lvt;
            self.state.lvt = (previous_lvt + jump).min(self.config.max_virtual_time);
            self.stats.internal_events += 1;
            self.log(LogPayload::InternalProcessed {
                worker_id: self.id,
                previous_lvt,
                jump: self.state.lvt - previous_lvt,
            });
        }
    }

    /// Restores the latest checkpoint not newer than the straggler, then
    /// replays the history suffix, straggler included, since it is inserted
    /// before replay begins.
    fn roll_back(&mut self, straggler: Event) {
        self.stats.rollbacks += 1;
        self.history.insert(straggler);

        let target = self.checkpoints.latest_at_or_before(straggler.timestamp);
        let checkpoint = self.checkpoints.get(target);
        let rollback_from = self.state.lvt;

        self.log_at(
            checkpoint.state.lvt,
            LogPayload::RollbackStart {
                worker_id: self.id,
                rollback_from,
                rollback_to: straggler.timestamp,
            },
        );

        self.state = checkpoint.state;
        self.stats.last_virtual_time = self.state.lvt;
        self.checkpoints.truncate_to(target);

        // Each replayed event gets its own snapshot first, mirroring the
        // live path.
        for index in checkpoint.history_len..self.history.len() {
            self.take_checkpoint(index, CheckpointMode::Replay);
            let event = self.history.as_slice()[index];
            self.process_external(event, true);
        }

        self.log(LogPayload::RollbackEnd {
            worker_id: self.id,
            rollback_from,
            rollback_to: straggler.timestamp,
        });
    }

    fn take_checkpoint(&mut self, history_len: usize, mode: CheckpointMode) {
        self.checkpoints.push(Checkpoint {
            state: self.state,
            history_len,
        });
        self.stats.checkpoints_built += 1;
        self.log(LogPayload::CheckpointCreated {
            worker_id: self.id,
            history_len,
            mode,
        });
    }

    fn log(&self, payload: LogPayload) {
        self.log_at(self.state.lvt, payload);
    }

    fn log_at(&self, sim_time: u64, payload: LogPayload) {
        self.logger
            .log(LogRecord::new(Entity::Worker(self.id), sim_time, payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tidvarv_core::events::{bounded, EventSender};

    /// Degenerate ranges make the internal-event path deterministic without
    /// pinning RNG output: `count` and `jump` both collapse to one value.
    fn test_config(events_per_external: u64, jump: u64, max_virtual_time: u64) -> SimulationConfig {
        SimulationConfig {
            num_workers: 1,
            total_external_events: 3,
            internal_min_events: events_per_external,
            internal_max_events: events_per_external,
            internal_min_jump: jump,
            internal_max_jump: jump,
            max_virtual_time,
            ..SimulationConfig::default()
        }
    }

    fn test_worker(config: SimulationConfig) -> (Worker, EventSender, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let logger = Arc::new(SimLogger::create(dir.path().join("worker.log")).unwrap());
        let (tx, rx) = bounded(config.channel_buffer);
        (Worker::new(0, config, rx, logger), tx, dir)
    }

    #[test]
    fn straggler_free_stream_never_rolls_back() {
        let (mut worker, _tx, _dir) = test_worker(test_config(1, 1, 100));
        for (id, timestamp) in [(0, 5), (1, 9), (2, 14)] {
            worker.handle_external(Event::external(id, timestamp, 0));
        }
        assert_eq!(worker.stats.rollbacks, 0);
        assert_eq!(worker.stats.external_events, 3);
        assert_eq!(worker.stats.internal_events, 3);
        assert_eq!(worker.history.len(), 3);
        assert!(worker.history.is_ordered());
        // 14 from the last event plus one jump of 1.
        assert_eq!(worker.state.lvt, 15);
        assert!(worker.stats.last_virtual_time >= 14);
        // One live checkpoint per external event.
        assert_eq!(worker.stats.checkpoints_built, 3);
        assert!(worker.checkpoints.is_monotonic());
    }

    #[test]
    fn straggler_triggers_rollback_and_replay() {
        // One internal jump of 10 pushes LVT past the second event's
        // timestamp, forcing the straggler.
        let (mut worker, _tx, _dir) = test_worker(test_config(1, 10, 1000));
        worker.handle_external(Event::external(0, 5, 0));
        assert_eq!(worker.state.lvt, 15);

        worker.handle_external(Event::external(1, 7, 0));

        assert_eq!(worker.stats.rollbacks, 1);
        assert_eq!(worker.history.len(), 2);
        assert!(worker.history.is_ordered());
        // The first event live, then both replayed.
        assert_eq!(worker.stats.external_events, 3);
        // Two live checkpoints plus one replay checkpoint per replayed event.
        assert_eq!(worker.stats.checkpoints_built, 4);
        assert!(worker.checkpoints.is_monotonic());
        // Replay re-processed the straggler last: 7 plus one jump of 10.
        assert_eq!(worker.state.lvt, 17);
        assert_eq!(worker.stats.last_virtual_time, 17);
    }

    #[test]
    fn checkpoints_built_grows_by_replay_suffix_plus_live_snapshot() {
        let (mut worker, _tx, _dir) = test_worker(test_config(1, 10, 1000));
        worker.handle_external(Event::external(0, 5, 0));
        let before = worker.stats.checkpoints_built;
        let history_before = worker.history.len();

        worker.handle_external(Event::external(1, 7, 0));

        // One live snapshot for the arrival plus one per replayed entry; the
        // restored checkpoint here has history_len 0, so the whole history
        // replays.
        let replayed = worker.history.len() as u64;
        assert_eq!(worker.stats.checkpoints_built - before, 1 + replayed);
        assert_eq!(worker.history.len(), history_before + 1);
    }

    #[test]
    fn rollback_reaches_initial_checkpoint_state() {
        // First event advances to 10; a timestamp-0 straggler must restore
        // an LVT-0 snapshot and replay in (0, then 1) timestamp order.
        let (mut worker, _tx, _dir) = test_worker(test_config(1, 9, 1000));
        worker.handle_external(Event::external(0, 1, 0));
        assert_eq!(worker.state.lvt, 10);

        worker.handle_external(Event::external(1, 0, 0));

        assert_eq!(worker.stats.rollbacks, 1);
        let timestamps: Vec<u64> = worker
            .history
            .as_slice()
            .iter()
            .map(|e| e.timestamp)
            .collect();
        assert_eq!(timestamps, vec![0, 1]);
        // 10 only results from replaying ts=0 first and ts=1 second; the
        // reverse order would end at 9.
        assert_eq!(worker.state.lvt, 10);
    }

    #[test]
    fn equal_timestamp_event_is_not_a_straggler() {
        let (mut worker, _tx, _dir) = test_worker(test_config(1, 5, 1000));
        worker.handle_external(Event::external(0, 5, 0));
        assert_eq!(worker.state.lvt, 10);

        worker.handle_external(Event::external(1, 10, 0));

        assert_eq!(worker.stats.rollbacks, 0);
        assert_eq!(worker.stats.external_events, 2);
        assert_eq!(worker.state.lvt, 15);
    }

    #[test]
    fn lvt_clamps_at_the_virtual_time_ceiling() {
        let (mut worker, _tx, _dir) = test_worker(test_config(3, 10, 12));
        worker.handle_external(Event::external(0, 5, 0));
        // First jump reaches the ceiling (5 + 10 clamped to 12); further
        // internal events stop generating.
        assert_eq!(worker.state.lvt, 12);
        assert_eq!(worker.stats.internal_events, 1);
    }

    #[test]
    fn run_drains_the_channel_before_stopping() {
        let config = test_config(1, 1, 100);
        let (worker, tx, _dir) = test_worker(config);
        let handle = thread::spawn(move || worker.run());
        for (id, timestamp) in [(0, 2), (1, 4), (2, 6)] {
            tx.send(Event::external(id, timestamp, 0)).unwrap();
        }
        drop(tx);
        let stats = handle.join().unwrap();
        assert_eq!(stats.external_events, 3);
        assert_eq!(stats.id, 0);
    }

    #[test]
    fn identical_seeds_yield_identical_stats() {
        let run = || {
            let (mut worker, _tx, _dir) = test_worker(SimulationConfig {
                num_workers: 1,
                total_external_events: 4,
                seed: 1234,
                ..SimulationConfig::default()
            });
            for (id, timestamp) in [(0, 3), (1, 4), (2, 9), (3, 11)] {
                worker.handle_external(Event::external(id, timestamp, 0));
            }
            worker.stats
        };
        assert_eq!(run(), run());
    }
}
