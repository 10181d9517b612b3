//! Location of the overlay config file.

use std::path::{Path, PathBuf};

use overlay_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const CONFIG_DIR: &str = "overlay";
const CONFIG_FILE: &str = "config.toml";

/// `<user config dir>/overlay/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
        .ok_or_else(|| ConfigError::ParseError("no user config directory on this platform".into()))
}

/// Write the template to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_error = |e: std::io::Error| ConfigError::ParseError(format!("{}: {e}", path.display()));

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(io_error)?;
    }
    std::fs::write(path, default_config_toml()).map_err(io_error)?;

    info!(path = %path.display(), "wrote default overlay config");
    Ok(())
}
