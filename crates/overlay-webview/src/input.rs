//! Touch input events as seen by the host surface.

use serde::{Deserialize, Serialize};

/// Phase of a touch event within a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    /// First pointer went down; starts a gesture.
    Down,
    /// An additional pointer went down (multi-touch).
    PointerDown,
    Move,
    /// A non-final pointer went up.
    PointerUp,
    /// Last pointer went up; ends the gesture.
    Up,
    Cancel,
}

impl TouchPhase {
    /// Whether this phase closes the current gesture stream.
    pub fn ends_stream(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }
}

/// Device class that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    Touchscreen,
    Stylus,
    Mouse,
}

/// One touch event in host device-pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub pointer_id: u32,
    /// `None` marks a synthetic event produced inside the host.
    #[serde(default)]
    pub source: Option<InputSource>,
    #[serde(default)]
    pub time_ms: u64,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, x: f64, y: f64) -> Self {
        Self {
            phase,
            x,
            y,
            pointer_id: 0,
            source: Some(InputSource::Touchscreen),
            time_ms: 0,
        }
    }

    pub fn down(x: f64, y: f64) -> Self {
        Self::new(TouchPhase::Down, x, y)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(TouchPhase::Move, x, y)
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::new(TouchPhase::Up, x, y)
    }

    pub fn synthetic(mut self) -> Self {
        self.source = None;
        self
    }

    /// Copy of this event shifted by `(-dx, -dy)`.
    pub fn offset_by(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x - dx,
            y: self.y - dy,
            ..self.clone()
        }
    }
}
