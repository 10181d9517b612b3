//! Conversion between host-logical units and device pixels.

use overlay_common::{LogicalRect, PixelRect};

/// Convert a logical value to device pixels, rounding half up.
pub fn to_device_pixels(logical: f64, scale: f64) -> i32 {
    (logical * scale + 0.5).floor() as i32
}

/// Convert a device-pixel value back to logical units.
pub fn to_logical(device: f64, scale: f64) -> f64 {
    device / scale
}

/// Scale all four edges of `rect` independently.
///
/// Width and height of the result are derived from the scaled edges, never
/// scaled on their own, so adjacent rects stay adjacent after rounding.
pub fn scale_rect(rect: &LogicalRect, scale: f64) -> PixelRect {
    PixelRect {
        left: to_device_pixels(rect.x, scale),
        top: to_device_pixels(rect.y, scale),
        right: to_device_pixels(rect.right(), scale),
        bottom: to_device_pixels(rect.bottom(), scale),
    }
}
