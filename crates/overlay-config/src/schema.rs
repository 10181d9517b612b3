//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub surfaces: SurfaceDefaults,
    pub host: HostConfig,
    pub logging: LoggingConfig,
}

/// Defaults applied to surfaces when a create call leaves them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceDefaults {
    /// Device pixels per logical unit when the caller omits `devicePixelRatio`.
    pub device_pixel_ratio: f64,
    /// Whether new surfaces intercept touch input before `enableTouch`.
    pub touch_enabled: bool,
}

impl Default for SurfaceDefaults {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            touch_enabled: false,
        }
    }
}

/// Settings for the headless host used by the harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Display density of the host view (device pixels per logical unit).
    pub density: f64,
    /// When false, every create fails as if the host view were gone.
    pub available: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            available: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OverlayConfig::default();
        assert!((config.surfaces.device_pixel_ratio - 1.0).abs() < f64::EPSILON);
        assert!(!config.surfaces.touch_enabled);
        assert!((config.host.density - 1.0).abs() < f64::EPSILON);
        assert!(config.host.available);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let toml_str = r#"
[surfaces]
touch_enabled = true

[host]
density = 2.75
"#;
        let config: OverlayConfig = toml::from_str(toml_str).unwrap();
        assert!(config.surfaces.touch_enabled);
        assert!((config.surfaces.device_pixel_ratio - 1.0).abs() < f64::EPSILON);
        assert!((config.host.density - 2.75).abs() < f64::EPSILON);
        assert!(config.host.available);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn empty_toml_is_default() {
        let config: OverlayConfig = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
    }
}
