//! Command-line surface.
//!
//! Flags override values from the optional YAML configuration file, which in
//! turn overrides built-in defaults.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use tidvarv_config::SimulationConfig;
use tidvarv_engine::{run_simulation, run_speedup_experiment, SimulationReport, SpeedupReport};

#[derive(Parser)]
#[command(
    name = "tidvarv",
    version,
    about = "Optimistic parallel discrete-event simulation engine"
)]
pub struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one simulation and print the per-worker summary
    Run(SimArgs),
    /// Measure wall-clock speedup at 1, 2, 4 and 8 workers
    Speedup(SimArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SimArgs {
    /// Number of workers in the simulation
    #[arg(long)]
    pub workers: Option<usize>,

    /// Total number of external events to generate
    #[arg(long)]
    pub events: Option<usize>,

    /// Simulation log file to write
    #[arg(long)]
    pub log: Option<String>,

    /// Seed for the scheduler and worker event generators
    #[arg(long)]
    pub seed: Option<i64>,

    /// Buffer size of the scheduler-to-worker channels
    #[arg(long)]
    pub channel_buffer: Option<usize>,

    /// Minimum internal events per external event
    #[arg(long)]
    pub internal_min: Option<u64>,

    /// Maximum internal events per external event
    #[arg(long)]
    pub internal_max: Option<u64>,

    /// Minimum LVT advance caused by an internal event
    #[arg(long)]
    pub jump_min: Option<u64>,

    /// Maximum LVT advance caused by an internal event
    #[arg(long)]
    pub jump_max: Option<u64>,

    /// Upper bound on virtual time for scheduler and workers
    #[arg(long)]
    pub max_time: Option<u64>,
}

impl SimArgs {
    fn apply(self, mut config: SimulationConfig) -> SimulationConfig {
        if let Some(workers) = self.workers {
            config.num_workers = workers;
        }
        if let Some(events) = self.events {
            config.total_external_events = events;
        }
        if let Some(log) = self.log {
            config.log_path = log;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(channel_buffer) = self.channel_buffer {
            config.channel_buffer = channel_buffer;
        }
        if let Some(internal_min) = self.internal_min {
            config.internal_min_events = internal_min;
        }
        if let Some(internal_max) = self.internal_max {
            config.internal_max_events = internal_max;
        }
        if let Some(jump_min) = self.jump_min {
            config.internal_min_jump = jump_min;
        }
        if let Some(jump_max) = self.jump_max {
            config.internal_max_jump = jump_max;
        }
        if let Some(max_time) = self.max_time {
            config.max_virtual_time = max_time;
        }
        config
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let base = match &cli.config {
        Some(path) => SimulationConfig::load_from_path(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimulationConfig::load()?,
    };

    match cli.command {
        Command::Run(args) => {
            let config = args.apply(base);
            let report = run_simulation(&config)?;
            print_report(&config, &report);
        }
        Command::Speedup(args) => {
            let config = args.apply(base);
            let report = run_speedup_experiment(&config)?;
            print_speedup(&report);
        }
    }
    Ok(())
}

fn print_report(config: &SimulationConfig, report: &SimulationReport) {
    println!(
        "Simulation finished in {:?}. Events dispatched: {}",
        report.duration, report.events_dispatched
    );
    for stats in &report.worker_stats {
        println!(
            "Worker {} -> external: {}, internal: {}, rollbacks: {}, checkpoints: {}, final LVT: {}",
            stats.id,
            stats.external_events,
            stats.internal_events,
            stats.rollbacks,
            stats.checkpoints_built,
            stats.last_virtual_time
        );
    }
    println!("Log written to {}", config.log_path);
}

fn print_speedup(report: &SpeedupReport) {
    for sample in &report.samples {
        println!(
            "Workers: {}\tDuration: {:?}\tEvents: {}\tLog: {}",
            sample.num_workers, sample.duration, sample.events_dispatched, sample.log_path
        );
    }
    println!("\nSpeedup analysis:");
    for (num_workers, speedup) in report.relative_speedups() {
        println!("Workers: {num_workers}\tSpeedup: {speedup:.2}");
    }
}
