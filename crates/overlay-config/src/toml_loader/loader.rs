//! Reading `config.toml` into an [`OverlayConfig`].

use std::path::Path;

use overlay_common::ConfigError;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};
use crate::schema::OverlayConfig;
use crate::validation;

/// Parse the surface, host and logging sections at `path`.
///
/// Out-of-range values only produce a warning here. The harness runs
/// [`validation::validate`] again for `--config` files so that a bad
/// override is rejected rather than silently used.
pub fn load_from_path(path: &Path) -> Result<OverlayConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
    let config: OverlayConfig = toml::from_str(&text)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "overlay config out of range: {e}");
    }

    info!(path = %path.display(), "overlay config loaded");
    Ok(config)
}

/// Load `overlay/config.toml` from the user config directory, writing the
/// commented template there on first run.
pub fn load_default() -> Result<OverlayConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(OverlayConfig::default())
        }
        loaded => loaded,
    }
}
