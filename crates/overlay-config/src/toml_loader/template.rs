//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> &'static str {
    r##"# Overlay Configuration
# Only override what you want to change -- missing fields use defaults.

[surfaces]
# device_pixel_ratio = 1.0   # used when create omits devicePixelRatio
# touch_enabled = false      # surfaces must opt in with enableTouch

[host]
# density = 1.0              # headless host display density
# available = true

[logging]
# level = "info"             # trace, debug, info, warn, error
"##
}
