//! # tidvarv-config
//!
//! Simulation parameters for the tidvarv engine.
//!
//! One record, `SimulationConfig`, parameterizes a whole run. It is validated
//! once before any thread spawns and is read-only afterwards. Loading layers
//! three sources:
//! 1. Built-in defaults
//! 2. An optional YAML file
//! 3. `TIDVARV_*` environment variables

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use validator::Validate;

mod error;
mod simulation;
mod validation;

pub use error::ConfigError;
pub use simulation::SimulationConfig;

/// Environment variable prefix recognized during loading.
const ENV_PREFIX: &str = "TIDVARV_";

impl SimulationConfig {
    /// Loads configuration from defaults and `TIDVARV_*` environment
    /// variables only.
    pub fn load() -> Result<Self, ConfigError> {
        Figment::from(Serialized::defaults(SimulationConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(ConfigError::from)
            .and_then(Self::validated)
    }

    /// Loads configuration from a YAML file, layered under environment
    /// overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Figment::from(Serialized::defaults(SimulationConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(ConfigError::from)
            .and_then(Self::validated)
    }

    /// Runs the precondition checks and returns the record unchanged on
    /// success.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}
