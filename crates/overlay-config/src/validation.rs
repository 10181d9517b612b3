//! Configuration validation. Collects every problem into one error.

use overlay_common::ConfigError;

use crate::schema::OverlayConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Push an error unless `min < value <= max`.
fn validate_positive_range(errors: &mut Vec<String>, name: &str, value: f64, max: f64) {
    if !(value > 0.0 && value <= max) {
        errors.push(format!("{name} = {value} is out of range (0, {max}]"));
    }
}

/// Run all validations on a config.
pub fn validate(config: &OverlayConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_positive_range(
        &mut errors,
        "surfaces.device_pixel_ratio",
        config.surfaces.device_pixel_ratio,
        10.0,
    );
    validate_positive_range(&mut errors, "host.density", config.host.density, 10.0);

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "logging.level = {:?} is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
