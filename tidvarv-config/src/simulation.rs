//! The simulation parameter record.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

/// Parameters for one simulation run.
///
/// Field-level rules cover the individual bounds; the schema rule covers the
/// constraints that span fields (event totals versus worker count, ordered
/// internal ranges).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = validation::validate_cross_field))]
pub struct SimulationConfig {
    /// Worker pool width; one OS thread each.
    #[validate(range(min = 1))]
    pub num_workers: usize,

    /// Upper bound on the number of external events the scheduler dispatches.
    /// Must cover the pool (`>= num_workers`).
    pub total_external_events: usize,

    /// Fewest internal events generated per processed external event.
    #[validate(range(min = 1))]
    pub internal_min_events: u64,

    /// Most internal events generated per processed external event.
    pub internal_max_events: u64,

    /// Smallest virtual-time advance per internal event.
    #[validate(range(min = 1))]
    pub internal_min_jump: u64,

    /// Largest virtual-time advance per internal event.
    pub internal_max_jump: u64,

    /// Capacity of each scheduler-to-worker channel.
    #[validate(range(min = 1))]
    pub channel_buffer: usize,

    /// Destination for the JSON-lines simulation log.
    #[validate(length(min = 1))]
    pub log_path: String,

    /// Base seed; the scheduler and each worker derive their own RNG from it.
    pub seed: i64,

    /// Ceiling on virtual time for the scheduler clock and worker LVTs.
    #[validate(range(min = 1))]
    pub max_virtual_time: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_workers: 2,
            total_external_events: 40,
            internal_min_events: 1,
            internal_max_events: 3,
            internal_min_jump: 1,
            internal_max_jump: 5,
            channel_buffer: 8,
            log_path: "execution.log".into(),
            seed: 42,
            max_virtual_time: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn rejects_zero_workers() {
        let config = SimulationConfig {
            num_workers: 0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_event_total_below_worker_count() {
        let config = SimulationConfig {
            num_workers: 8,
            total_external_events: 4,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_internal_event_range() {
        let config = SimulationConfig {
            internal_min_events: 5,
            internal_max_events: 2,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_jump_range() {
        let config = SimulationConfig {
            internal_min_jump: 9,
            internal_max_jump: 3,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_log_path() {
        let config = SimulationConfig {
            log_path: String::new(),
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn accepts_any_signed_seed() {
        let config = SimulationConfig {
            seed: i64::MIN,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn degenerate_equal_ranges_are_valid() {
        let config = SimulationConfig {
            internal_min_events: 1,
            internal_max_events: 1,
            internal_min_jump: 1,
            internal_max_jump: 1,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
