//! Full configuration validation.
//!
//! Validates numeric ranges and script-facing names, collecting every
//! problem into a single error.

use crate::schema::WitoConfig;
use wito_common::{is_script_identifier, ConfigError};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WitoConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(&mut errors, "window.width", config.window.width, 100, 16384);
    validate_range(&mut errors, "window.height", config.window.height, 100, 16384);

    if let Some(n) = config.bridge.worker_threads {
        validate_range(&mut errors, "bridge.worker_threads", n, 1, 64);
    }
    validate_range(
        &mut errors,
        "bridge.call_timeout_secs",
        config.bridge.call_timeout_secs,
        1,
        3600,
    );

    if !is_script_identifier(&config.bridge.global_name) {
        errors.push(format!(
            "bridge.global_name must be a JavaScript identifier (not a reserved word), got '{}'",
            config.bridge.global_name
        ));
    }

    if config.app.entry.trim().is_empty() {
        errors.push("app.entry must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range<T: PartialOrd + std::fmt::Display>(
    errors: &mut Vec<String>,
    field: &str,
    value: T,
    min: T,
    max: T,
) {
    if value < min || value > max {
        errors.push(format!("{field} must be {min}-{max}, got {value}"));
    }
}
