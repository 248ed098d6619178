//! Speedup measurement: reruns one configuration at growing worker counts
//! and compares wall-clock durations against the single-worker baseline.

use std::path::Path;
use std::time::Duration;

use tracing::info;

use tidvarv_config::SimulationConfig;

use crate::error::EngineError;
use crate::runtime::run_simulation;

/// Pool widths exercised by the experiment, baseline first.
pub const SPEEDUP_WORKER_COUNTS: [usize; 4] = [1, 2, 4, 8];

/// One measured run of the experiment.
#[derive(Debug, Clone)]
pub struct SpeedupSample {
    pub num_workers: usize,
    pub duration: Duration,
    pub events_dispatched: usize,
    pub log_path: String,
}

/// Samples in `SPEEDUP_WORKER_COUNTS` order.
#[derive(Debug, Clone)]
pub struct SpeedupReport {
    pub samples: Vec<SpeedupSample>,
}

impl SpeedupReport {
    /// Wall-clock speedup of each sample relative to the first (1-worker)
    /// sample.
    pub fn relative_speedups(&self) -> Vec<(usize, f64)> {
        let baseline = self.samples[0].duration.as_secs_f64();
        self.samples
            .iter()
            .map(|sample| {
                let duration = sample.duration.as_secs_f64();
                let speedup = if duration > 0.0 {
                    baseline / duration
                } else {
                    f64::INFINITY
                };
                (sample.num_workers, speedup)
            })
            .collect()
    }
}

/// Runs `base` at 1, 2, 4 and 8 workers, one log file per width.
///
/// The base `total_external_events` must cover the widest pool, or that
/// width's validation will reject it.
pub fn run_speedup_experiment(base: &SimulationConfig) -> Result<SpeedupReport, EngineError> {
    let mut samples = Vec::with_capacity(SPEEDUP_WORKER_COUNTS.len());
    for &num_workers in &SPEEDUP_WORKER_COUNTS {
        let config = SimulationConfig {
            num_workers,
            log_path: width_log_path(&base.log_path, num_workers),
            ..base.clone()
        };
        info!(num_workers, log = %config.log_path, "speedup sample");
        let report = run_simulation(&config)?;
        samples.push(SpeedupSample {
            num_workers,
            duration: report.duration,
            events_dispatched: report.events_dispatched,
            log_path: config.log_path,
        });
    }
    Ok(SpeedupReport { samples })
}

/// Places `speedup_w<n>.log` next to the configured log file.
fn width_log_path(base_log: &str, num_workers: usize) -> String {
    let file_name = format!("speedup_w{num_workers}.log");
    match Path::new(base_log).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(file_name).to_string_lossy().into_owned()
        }
        _ => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_log_path_stays_in_the_base_directory() {
        assert_eq!(width_log_path("logs/run.log", 4), "logs/speedup_w4.log");
        assert_eq!(width_log_path("run.log", 2), "speedup_w2.log");
    }

    #[test]
    fn experiment_produces_one_sample_per_width() {
        let dir = tempfile::tempdir().unwrap();
        let base = SimulationConfig {
            total_external_events: 16,
            log_path: dir.path().join("base.log").to_string_lossy().into_owned(),
            ..SimulationConfig::default()
        };
        let report = run_speedup_experiment(&base).unwrap();

        assert_eq!(report.samples.len(), SPEEDUP_WORKER_COUNTS.len());
        for (sample, expected_workers) in report.samples.iter().zip(SPEEDUP_WORKER_COUNTS) {
            assert_eq!(sample.num_workers, expected_workers);
            assert!(std::path::Path::new(&sample.log_path).exists());
        }

        let speedups = report.relative_speedups();
        assert_eq!(speedups[0].0, 1);
        assert!((speedups[0].1 - 1.0).abs() < f64::EPSILON || speedups[0].1.is_infinite());
    }

    #[test]
    fn experiment_rejects_a_base_too_small_for_the_widest_pool() {
        let dir = tempfile::tempdir().unwrap();
        let base = SimulationConfig {
            total_external_events: 4,
            log_path: dir.path().join("small.log").to_string_lossy().into_owned(),
            ..SimulationConfig::default()
        };
        // 4 events cannot cover the 8-worker width.
        assert!(run_speedup_experiment(&base).is_err());
    }
}
