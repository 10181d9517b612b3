use serde::Serialize;

use crate::input::TouchEvent;

/// Where the events of a gesture currently go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    /// Awaiting a focus decision; events are held back.
    #[default]
    Buffering,
    /// The surface owns the gesture.
    Forwarded,
    /// The host owns the gesture.
    Discarded,
}

/// Per-surface gesture record.
#[derive(Debug, Default)]
pub(crate) struct Gesture {
    pub(crate) state: GestureState,
    pub(crate) buffer: Vec<TouchEvent>,
}

impl Gesture {
    /// Start a fresh gesture: empty buffer, undecided.
    pub(crate) fn restart(&mut self) {
        self.state = GestureState::Buffering;
        self.buffer.clear();
    }

    /// Settle the gesture and hand back everything held so far, oldest first.
    pub(crate) fn decide(&mut self, focus: bool) -> Vec<TouchEvent> {
        self.state = if focus {
            GestureState::Forwarded
        } else {
            GestureState::Discarded
        };
        std::mem::take(&mut self.buffer)
    }
}
