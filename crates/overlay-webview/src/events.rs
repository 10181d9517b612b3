//! Events emitted to the controlling application.

use std::sync::{Arc, Mutex, PoisonError};

use overlay_common::SurfaceId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Notification tagged with the surface it originated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum SurfaceEvent {
    #[serde(rename = "onPageStarted")]
    PageStarted {
        #[serde(rename = "webViewId")]
        surface_id: SurfaceId,
    },
    #[serde(rename = "onPageFinished")]
    PageFinished {
        #[serde(rename = "webViewId")]
        surface_id: SurfaceId,
    },
    #[serde(rename = "onProgressChanged")]
    ProgressChanged {
        #[serde(rename = "webViewId")]
        surface_id: SurfaceId,
        #[serde(rename = "newProgress")]
        new_progress: u8,
    },
    /// A touch landed on the surface; the application answers with a focus
    /// decision. `x`/`y` are host coordinates in the surface's logical units.
    #[serde(rename = "isWebViewInFocus")]
    FocusQuery {
        #[serde(rename = "webViewId")]
        surface_id: SurfaceId,
        x: f64,
        y: f64,
    },
}

impl SurfaceEvent {
    pub fn surface_id(&self) -> &SurfaceId {
        match self {
            Self::PageStarted { surface_id }
            | Self::PageFinished { surface_id }
            | Self::ProgressChanged { surface_id, .. }
            | Self::FocusQuery { surface_id, .. } => surface_id,
        }
    }
}

/// Shared event sink. Content callbacks and the touch router push here; the
/// host loop drains.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: SurfaceEvent) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&self) -> Vec<SurfaceEvent> {
        let mut events = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A listener that tags page events with `surface_id`.
    pub fn listener(&self, surface_id: SurfaceId) -> PageListener {
        PageListener {
            surface_id,
            events: self.clone(),
        }
    }
}

/// Page lifecycle callbacks handed to a content handle.
#[derive(Debug, Clone)]
pub struct PageListener {
    surface_id: SurfaceId,
    events: EventQueue,
}

impl PageListener {
    pub fn surface_id(&self) -> &SurfaceId {
        &self.surface_id
    }

    pub fn page_started(&self) {
        debug!(surface_id = %self.surface_id, "page started");
        self.events.push(SurfaceEvent::PageStarted {
            surface_id: self.surface_id.clone(),
        });
    }

    pub fn page_finished(&self) {
        debug!(surface_id = %self.surface_id, "page finished");
        self.events.push(SurfaceEvent::PageFinished {
            surface_id: self.surface_id.clone(),
        });
    }

    pub fn progress_changed(&self, new_progress: u8) {
        self.events.push(SurfaceEvent::ProgressChanged {
            surface_id: self.surface_id.clone(),
            new_progress: new_progress.min(100),
        });
    }
}
