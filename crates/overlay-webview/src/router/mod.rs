//! Touch routing between the host surface and overlay surfaces.
//!
//! Every touch that reaches the host passes through [`TouchRouter::route`].
//! A DOWN inside a touch-enabled, visible surface claims the stream for that
//! surface. Until the application answers the resulting focus query, the
//! stream is buffered; [`TouchRouter::dispatch_focus`] then replays it either
//! into the surface or back to the host, and later events of the same
//! gesture follow the decision directly.

use std::collections::HashMap;

use overlay_common::{Result, SurfaceId};
use tracing::debug;

use crate::events::SurfaceEvent;
use crate::geometry::to_logical;
use crate::host::InputSink;
use crate::input::{TouchEvent, TouchPhase};
use crate::registry::SurfaceRegistry;

mod gesture;

use gesture::Gesture;
pub use gesture::GestureState;

/// Where a routed event ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Handled by the host's default touch handling.
    Host,
    /// Held for the surface pending a focus decision.
    Buffered(SurfaceId),
    /// Delivered into the surface.
    Forwarded(SurfaceId),
    /// Claimed by the surface but handed to the host after a negative
    /// decision.
    Returned(SurfaceId),
}

impl RouteOutcome {
    /// Whether the host's own handling saw the event.
    pub fn reached_host(&self) -> bool {
        matches!(self, Self::Host | Self::Returned(_))
    }
}

#[derive(Debug, Default)]
pub struct TouchRouter {
    gestures: HashMap<SurfaceId, Gesture>,
    /// Surface that claimed the DOWN of the stream in progress.
    active: Option<SurfaceId>,
}

impl TouchRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(
        &mut self,
        event: &TouchEvent,
        registry: &mut SurfaceRegistry,
        host: &mut dyn InputSink,
        density: f64,
    ) -> RouteOutcome {
        if event.source.is_none() {
            host.on_touch_event(event);
            return RouteOutcome::Host;
        }

        if event.phase == TouchPhase::Down {
            self.active = None;
            match Self::hit_test(registry, event.x, event.y, density) {
                Some(id) => {
                    debug!(surface_id = %id, x = event.x, y = event.y, "gesture claimed");
                    self.gestures.entry(id.clone()).or_default().restart();
                    self.active = Some(id);
                }
                None => {
                    host.on_touch_event(event);
                    return RouteOutcome::Host;
                }
            }
        }

        let Some(owner) = self.active.clone() else {
            host.on_touch_event(event);
            return RouteOutcome::Host;
        };
        if event.phase.ends_stream() {
            self.active = None;
        }

        let events = registry.events().clone();
        let surface = match registry.get_mut(&owner) {
            Ok(surface) => surface,
            Err(_) => {
                self.forget(&owner);
                host.on_touch_event(event);
                return RouteOutcome::Host;
            }
        };

        let gesture = self.gestures.entry(owner.clone()).or_default();
        match gesture.state {
            GestureState::Buffering => {
                gesture.buffer.push(event.clone());
                let ratio = surface.device_pixel_ratio();
                events.push(SurfaceEvent::FocusQuery {
                    surface_id: owner.clone(),
                    x: to_logical(event.x, ratio),
                    y: to_logical(event.y, ratio),
                });
                RouteOutcome::Buffered(owner)
            }
            GestureState::Forwarded => {
                surface.deliver(event, density);
                RouteOutcome::Forwarded(owner)
            }
            GestureState::Discarded => {
                host.on_touch_event(event);
                RouteOutcome::Returned(owner)
            }
        }
    }

    /// First touch-enabled, visible surface containing the point, in
    /// registration order.
    pub fn hit_test(
        registry: &SurfaceRegistry,
        x: f64,
        y: f64,
        density: f64,
    ) -> Option<SurfaceId> {
        registry
            .iter()
            .filter(|s| s.is_touch_enabled() && !s.is_hidden())
            .find(|s| s.device_bounds(density).contains(x, y))
            .map(|s| s.id().clone())
    }

    /// Apply the application's focus decision for `id`. Buffered events are
    /// replayed into the surface when `focus` is true and into the host
    /// otherwise. Returns how many events were replayed.
    pub fn dispatch_focus(
        &mut self,
        id: &SurfaceId,
        focus: bool,
        registry: &mut SurfaceRegistry,
        host: &mut dyn InputSink,
        density: f64,
    ) -> Result<usize> {
        let surface = registry.get_mut(id)?;
        let replay = self.gestures.entry(id.clone()).or_default().decide(focus);

        for event in &replay {
            if focus {
                surface.deliver(event, density);
            } else {
                host.on_touch_event(event);
            }
        }

        debug!(surface_id = %id, focus, replayed = replay.len(), "focus dispatched");
        Ok(replay.len())
    }

    /// Drop all state for a surface without replaying anything.
    pub fn forget(&mut self, id: &SurfaceId) {
        self.gestures.remove(id);
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
    }

    pub fn clear(&mut self) {
        self.gestures.clear();
        self.active = None;
    }

    pub fn buffered(&self, id: &SurfaceId) -> usize {
        self.gestures.get(id).map_or(0, |g| g.buffer.len())
    }

    pub fn state(&self, id: &SurfaceId) -> Option<GestureState> {
        self.gestures.get(id).map(|g| g.state)
    }

    pub fn active(&self) -> Option<&SurfaceId> {
        self.active.as_ref()
    }
}
