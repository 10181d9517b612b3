//! Overlay configuration.
//!
//! TOML-based configuration for the overlay plugin and its harness. Every
//! section uses serde defaults so partial configs work.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{HostConfig, LoggingConfig, OverlayConfig, SurfaceDefaults};
pub use toml_loader::{default_config_path, load_default, load_from_path};

use overlay_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<OverlayConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &OverlayConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&OverlayConfig::default());
        assert!(json.contains("\"surfaces\""));
        assert!(json.contains("\"host\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&OverlayConfig::default());
        let parsed: OverlayConfig = serde_json::from_str(&json).unwrap();
        assert!((parsed.surfaces.device_pixel_ratio - 1.0).abs() < f64::EPSILON);
        assert!(!parsed.surfaces.touch_enabled);
        assert_eq!(parsed.logging.level, "info");
    }
}
