//! External event production.
//!
//! The scheduler owns one sender endpoint per worker and a virtual clock
//! that only moves forward, so the events it dispatches to any single worker
//! are strictly increasing in both timestamp and id. Stragglers are entirely
//! a worker-side phenomenon: they appear when internal events push a
//! worker's LVT past the timestamp of the next dispatch.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use tidvarv_config::SimulationConfig;
use tidvarv_core::events::{Event, EventSender};
use tidvarv_telemetry::{Entity, LogPayload, LogRecord, SimLogger};

/// Per-iteration clock advance is drawn from this inclusive range.
const CLOCK_STEP_RANGE: std::ops::RangeInclusive<u64> = 1..=4;

pub struct Scheduler {
    config: SimulationConfig,
    outputs: Vec<EventSender>,
    logger: Arc<SimLogger>,
    rng: StdRng,
    clock: u64,
    next_event_id: u64,
}

impl Scheduler {
    /// Builds a scheduler seeded from `config.seed + 42`; part of the
    /// observable behavior, as with the worker seeds.
    pub fn new(
        config: SimulationConfig,
        outputs: Vec<EventSender>,
        logger: Arc<SimLogger>,
    ) -> Self {
        let seed = config.seed.wrapping_add(42) as u64;
        Self {
            config,
            outputs,
            logger,
            rng: StdRng::seed_from_u64(seed),
            clock: 0,
            next_event_id: 0,
        }
    }

    /// Dispatches up to `total_external_events` events, stopping early once
    /// the clock would pass `max_virtual_time`. Returns the number actually
    /// pushed. Consumes the scheduler, so every channel closes on return.
    pub fn run(mut self) -> usize {
        let mut dispatched = 0;
        for _ in 0..self.config.total_external_events {
            self.clock += self.rng.gen_range(CLOCK_STEP_RANGE);
            if self.clock > self.config.max_virtual_time {
                debug!(
                    clock = self.clock,
                    dispatched, "virtual-time ceiling reached, stopping dispatch"
                );
                break;
            }

            let target = self.rng.gen_range(0..self.config.num_workers);
            let event = Event::external(self.next_event_id, self.clock, target);
            self.next_event_id += 1;

            self.logger.log(LogRecord::new(
                Entity::Scheduler,
                self.clock,
                LogPayload::ExternalDispatched {
                    event_id: event.id,
                    target_worker: target,
                },
            ));

            // May block while the target's buffer is full. A closed channel
            // here means a worker died mid-run, which is a wiring bug.
            self.outputs[target]
                .send(event)
                .expect("worker channel closed while dispatch was still active");
            dispatched += 1;
        }
        dispatched
    }
}
