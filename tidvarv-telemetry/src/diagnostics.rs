//! Operator-facing diagnostics.
//!
//! Initializes the global `tracing` subscriber used for progress and error
//! reporting. This stream is separate from the simulation log and carries no
//! determinism guarantees.

use tracing_subscriber::EnvFilter;

/// Installs the diagnostic subscriber. `RUST_LOG` overrides the default
/// `info` filter. Call once, from the binary.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}
