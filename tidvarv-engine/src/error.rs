//! Engine error type.
//!
//! Only setup and teardown can fail recoverably. Domain events never produce
//! errors: stragglers are normal control flow and invariant violations are
//! bugs that panic.

use thiserror::Error;

use tidvarv_config::ConfigError;
use tidvarv_telemetry::TelemetryError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}
