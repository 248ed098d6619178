//! # tidvarv-telemetry
//!
//! Two output streams, strictly separated:
//!
//! - The **simulation log**: newline-delimited JSON records describing every
//!   significant simulation event, written through one shared [`SimLogger`].
//!   This stream is the product of a run and must stay deterministic per
//!   entity for a fixed seed.
//! - **Diagnostics**: operator-facing `tracing` output. Log-write failures
//!   land here and are otherwise ignored; the simulation never stops for
//!   them.

use std::path::PathBuf;

use thiserror::Error;

pub mod diagnostics;
pub mod logging;

pub use logging::{Entity, LogPayload, LogRecord, SimLogger};

/// Failure while opening or finalizing the simulation log sink.
///
/// Per-record write failures are not here on purpose: they are reported on
/// the diagnostic stream and the run continues.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to create simulation log at {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to flush simulation log: {0}")]
    Flush(#[from] std::io::Error),
}
