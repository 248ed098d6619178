//! Cross-field validation rules for the simulation parameters.

use validator::ValidationError;

use crate::SimulationConfig;

/// Constraints that span more than one field.
pub fn validate_cross_field(config: &SimulationConfig) -> Result<(), ValidationError> {
    if config.total_external_events < config.num_workers {
        return Err(ValidationError::new("events_below_worker_count")
            .with_message("total_external_events must be at least num_workers".into()));
    }
    if config.internal_max_events < config.internal_min_events {
        return Err(ValidationError::new("inverted_internal_event_range")
            .with_message("internal_max_events must be at least internal_min_events".into()));
    }
    if config.internal_max_jump < config.internal_min_jump {
        return Err(ValidationError::new("inverted_internal_jump_range")
            .with_message("internal_max_jump must be at least internal_min_jump".into()));
    }
    Ok(())
}
