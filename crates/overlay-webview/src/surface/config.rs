//! Surface creation config and bounds payloads, with validation.

use overlay_common::{LogicalRect, OverlayError, Result};
use serde::{Deserialize, Serialize};

/// Config as it arrives from the controlling application. Every field is
/// optional here; [`SurfaceConfig::from_raw`] enforces what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSurfaceConfig {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub device_pixel_ratio: Option<f64>,
    pub url: Option<String>,
}

/// Bounds payload of `onResize` / `onScroll`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBounds {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl RawBounds {
    pub fn to_rect(&self) -> Result<LogicalRect> {
        required_rect(self.x, self.y, self.width, self.height)
    }
}

impl From<LogicalRect> for RawBounds {
    fn from(r: LogicalRect) -> Self {
        Self {
            x: Some(r.x),
            y: Some(r.y),
            width: Some(r.width),
            height: Some(r.height),
        }
    }
}

/// Validated creation config.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    pub bounds: LogicalRect,
    /// Falls back to the configured default when `None`.
    pub device_pixel_ratio: Option<f64>,
    pub url: Option<String>,
}

impl SurfaceConfig {
    pub fn new(bounds: LogicalRect) -> Self {
        Self {
            bounds,
            device_pixel_ratio: None,
            url: None,
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = Some(ratio);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn from_raw(raw: &RawSurfaceConfig) -> Result<Self> {
        let bounds = required_rect(raw.x, raw.y, raw.width, raw.height)?;

        if let Some(ratio) = raw.device_pixel_ratio {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(OverlayError::validation(format!(
                    "devicePixelRatio must be a positive number, got {ratio}"
                )));
            }
        }

        let url = raw
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        Ok(Self {
            bounds,
            device_pixel_ratio: raw.device_pixel_ratio,
            url,
        })
    }
}

fn required_rect(
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<LogicalRect> {
    Ok(LogicalRect {
        width: required(width, "width")?,
        height: required(height, "height")?,
        x: required(x, "x")?,
        y: required(y, "y")?,
    })
}

fn required(value: Option<f64>, name: &str) -> Result<f64> {
    match value {
        None => Err(OverlayError::validation(format!(
            "WebViewConfig object is missing the required '{name}' property"
        ))),
        Some(v) if !v.is_finite() => Err(OverlayError::validation(format!(
            "'{name}' must be a finite number, got {v}"
        ))),
        Some(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_raw() -> RawSurfaceConfig {
        RawSurfaceConfig {
            width: Some(100.0),
            height: Some(200.0),
            x: Some(5.0),
            y: Some(6.0),
            device_pixel_ratio: None,
            url: None,
        }
    }

    #[test]
    fn from_raw_accepts_required_fields() {
        let config = SurfaceConfig::from_raw(&full_raw()).unwrap();
        assert_eq!(config.bounds, LogicalRect::new(5.0, 6.0, 100.0, 200.0));
        assert!(config.device_pixel_ratio.is_none());
        assert!(config.url.is_none());
    }

    #[test]
    fn missing_width_names_the_property() {
        let raw = RawSurfaceConfig {
            width: None,
            ..full_raw()
        };
        let err = SurfaceConfig::from_raw(&raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "WebViewConfig object is missing the required 'width' property"
        );
    }

    #[test]
    fn missing_y_is_rejected() {
        let raw = RawSurfaceConfig {
            y: None,
            ..full_raw()
        };
        assert!(matches!(
            SurfaceConfig::from_raw(&raw),
            Err(OverlayError::Validation(msg)) if msg.contains("'y'")
        ));
    }

    #[test]
    fn non_positive_ratio_is_rejected() {
        let raw = RawSurfaceConfig {
            device_pixel_ratio: Some(0.0),
            ..full_raw()
        };
        assert!(SurfaceConfig::from_raw(&raw).is_err());
    }

    #[test]
    fn blank_url_is_treated_as_absent() {
        let raw = RawSurfaceConfig {
            url: Some("   ".into()),
            ..full_raw()
        };
        assert!(SurfaceConfig::from_raw(&raw).unwrap().url.is_none());
    }

    #[test]
    fn camel_case_wire_form() {
        let raw: RawSurfaceConfig = serde_json::from_str(
            r#"{"x":0,"y":0,"width":100,"height":200,"devicePixelRatio":2,"url":"https://a.test"}"#,
        )
        .unwrap();
        let config = SurfaceConfig::from_raw(&raw).unwrap();
        assert_eq!(config.device_pixel_ratio, Some(2.0));
        assert_eq!(config.url.as_deref(), Some("https://a.test"));
    }

    #[test]
    fn raw_bounds_round_trip_rect() {
        let rect = LogicalRect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(RawBounds::from(rect).to_rect().unwrap(), rect);
        assert!(RawBounds::default().to_rect().is_err());
    }
}
