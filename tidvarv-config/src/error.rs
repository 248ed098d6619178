//! Error types for configuration loading and validation.

use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;
use validator::ValidationErrors;

/// Failure while producing a usable `SimulationConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("invalid configuration:\n{}", render_validation_errors(.0))]
    Validation(#[source] ValidationErrors),

    #[error("configuration parsing error: {0}")]
    Parsing(#[from] figment::Error),

    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}

fn render_validation_errors(errors: &ValidationErrors) -> String {
    let mut rendered = String::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let detail = error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| error.code.to_string());
            let _ = writeln!(rendered, "  {field}: {detail}");
        }
    }
    rendered
}
