//! Ordered map of live surfaces.

use indexmap::IndexMap;
use overlay_common::{OverlayError, Result, SurfaceId};
use overlay_config::SurfaceDefaults;
use tracing::{debug, info, warn};

use crate::events::{EventQueue, SurfaceEvent};
use crate::host::ViewHost;
use crate::surface::{Surface, SurfaceConfig};

/// What `create` did with the requested id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// The id was already registered and `force` was false; nothing changed.
    Existing,
    /// The previous surface was released and a new one took its place.
    Replaced,
}

/// Owns every [`Surface`], keyed by id, in registration order.
///
/// Registration order is the hit-test order: when surfaces overlap, the one
/// registered first wins.
#[derive(Debug)]
pub struct SurfaceRegistry {
    surfaces: IndexMap<SurfaceId, Surface>,
    events: EventQueue,
    defaults: SurfaceDefaults,
    paused: bool,
}

impl SurfaceRegistry {
    pub fn new(defaults: SurfaceDefaults) -> Self {
        Self {
            surfaces: IndexMap::new(),
            events: EventQueue::new(),
            defaults,
            paused: false,
        }
    }

    pub fn defaults(&self) -> &SurfaceDefaults {
        &self.defaults
    }

    pub fn create(
        &mut self,
        id: SurfaceId,
        config: &SurfaceConfig,
        force: bool,
        host: &mut dyn ViewHost,
    ) -> Result<CreateOutcome> {
        if id.is_empty() {
            return Err(OverlayError::validation("id is required"));
        }

        let outcome = if self.surfaces.contains_key(&id) {
            if !force {
                debug!(surface_id = %id, "surface already exists");
                return Ok(CreateOutcome::Existing);
            }
            if let Some(mut old) = self.surfaces.shift_remove(&id) {
                if let Err(e) = old.destroy() {
                    warn!(surface_id = %id, error = %e, "failed to release replaced surface");
                }
            }
            CreateOutcome::Replaced
        } else {
            CreateOutcome::Created
        };

        let ratio = config
            .device_pixel_ratio
            .unwrap_or(self.defaults.device_pixel_ratio);
        let listener = self.events.listener(id.clone());
        let mut surface = Surface::create(id.clone(), config, ratio, host, listener)?;
        surface.set_touch_enabled(self.defaults.touch_enabled);
        if self.paused {
            surface.pause(host.density());
        }

        info!(surface_id = %id, ?outcome, "surface created");
        self.surfaces.insert(id, surface);
        Ok(outcome)
    }

    /// Remove and release a surface. The entry is gone afterwards even when
    /// releasing its content fails.
    pub fn destroy(&mut self, id: &SurfaceId) -> Result<()> {
        let mut surface = self
            .surfaces
            .shift_remove(id)
            .ok_or_else(|| OverlayError::NotFound(id.clone()))?;

        info!(surface_id = %id, "surface destroyed");
        surface.destroy().map_err(|e| {
            warn!(surface_id = %id, error = %e, "failed to release content");
            OverlayError::from(e)
        })
    }

    pub fn get(&self, id: &SurfaceId) -> Result<&Surface> {
        self.surfaces
            .get(id)
            .ok_or_else(|| OverlayError::NotFound(id.clone()))
    }

    pub fn get_mut(&mut self, id: &SurfaceId) -> Result<&mut Surface> {
        self.surfaces
            .get_mut(id)
            .ok_or_else(|| OverlayError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &SurfaceId) -> bool {
        self.surfaces.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn ids(&self) -> Vec<SurfaceId> {
        self.surfaces.keys().cloned().collect()
    }

    /// Surfaces in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.values()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Collapse every visible surface and pause all content.
    pub fn pause(&mut self, density: f64) {
        self.paused = true;
        for surface in self.surfaces.values_mut() {
            surface.pause(density);
        }
        info!(count = self.surfaces.len(), "surfaces paused");
    }

    pub fn resume(&mut self, density: f64) {
        self.paused = false;
        for surface in self.surfaces.values_mut() {
            surface.resume(density);
        }
        info!(count = self.surfaces.len(), "surfaces resumed");
    }

    /// Release every surface and clear the map.
    pub fn teardown(&mut self) {
        for (id, mut surface) in self.surfaces.drain(..) {
            if let Err(e) = surface.destroy() {
                warn!(surface_id = %id, error = %e, "failed to release content during teardown");
            }
        }
        self.paused = false;
        info!("surface registry torn down");
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Drain every pending event from all surfaces.
    pub fn drain_events(&self) -> Vec<SurfaceEvent> {
        self.events.drain()
    }
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        Self::new(SurfaceDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use overlay_common::{LogicalRect, PixelRect};

    fn config(x: f64, y: f64, w: f64, h: f64) -> SurfaceConfig {
        SurfaceConfig::new(LogicalRect::new(x, y, w, h))
    }

    fn id(s: &str) -> SurfaceId {
        SurfaceId::from(s)
    }

    #[test]
    fn create_then_bounds_match_scaled_config() {
        let mut host = HeadlessHost::new(2.0);
        let mut registry = SurfaceRegistry::default();
        let cfg = config(0.0, 0.0, 100.0, 200.0).with_device_pixel_ratio(2.0);

        let outcome = registry.create(id("w1"), &cfg, false, &mut host).unwrap();
        assert_eq!(outcome, CreateOutcome::Created);
        let surface = registry.get(&id("w1")).unwrap();
        assert_eq!(surface.device_bounds(2.0), PixelRect::new(0, 0, 200, 400));
        assert!((surface.device_pixel_ratio() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_id_is_rejected() {
        let mut host = HeadlessHost::new(1.0);
        let mut registry = SurfaceRegistry::default();
        let err = registry
            .create(id(""), &config(0.0, 0.0, 1.0, 1.0), false, &mut host)
            .unwrap_err();
        assert_eq!(err.to_string(), "id is required");
        assert_eq!(host.attached_count(), 0);
    }

    #[test]
    fn existing_id_without_force_is_a_no_op() {
        let mut host = HeadlessHost::new(1.0);
        let mut registry = SurfaceRegistry::default();
        registry
            .create(id("a"), &config(0.0, 0.0, 10.0, 10.0), false, &mut host)
            .unwrap();
        registry
            .create(id("b"), &config(0.0, 0.0, 10.0, 10.0), false, &mut host)
            .unwrap();

        let outcome = registry
            .create(id("a"), &config(5.0, 5.0, 20.0, 20.0), false, &mut host)
            .unwrap();
        assert_eq!(outcome, CreateOutcome::Existing);
        assert_eq!(host.attached_count(), 2);
        assert_eq!(registry.ids(), vec![id("a"), id("b")]);
        assert_eq!(
            registry.get(&id("a")).unwrap().bounds(),
            LogicalRect::new(0.0, 0.0, 10.0, 10.0)
        );
    }

    #[test]
    fn force_create_releases_old_handle_and_moves_to_end() {
        let mut host = HeadlessHost::new(1.0);
        let mut registry = SurfaceRegistry::default();
        registry
            .create(id("a"), &config(0.0, 0.0, 10.0, 10.0), false, &mut host)
            .unwrap();
        registry
            .create(id("b"), &config(0.0, 0.0, 10.0, 10.0), false, &mut host)
            .unwrap();

        let outcome = registry
            .create(id("a"), &config(5.0, 5.0, 20.0, 20.0), true, &mut host)
            .unwrap();
        assert_eq!(outcome, CreateOutcome::Replaced);

        let records = host.contents_for("a");
        assert_eq!(records.len(), 2);
        assert!(records[0].destroyed);
        assert!(!records[1].destroyed);
        assert_eq!(registry.ids(), vec![id("b"), id("a")]);
    }

    #[test]
    fn destroy_unknown_is_not_found() {
        let mut registry = SurfaceRegistry::default();
        let err = registry.destroy(&id("ghost")).unwrap_err();
        assert!(matches!(err, OverlayError::NotFound(_)));
    }

    #[test]
    fn destroy_removes_and_releases() {
        let mut host = HeadlessHost::new(1.0);
        let mut registry = SurfaceRegistry::default();
        registry
            .create(id("a"), &config(0.0, 0.0, 10.0, 10.0), false, &mut host)
            .unwrap();
        registry.destroy(&id("a")).unwrap();
        assert!(!registry.contains(&id("a")));
        assert!(host.content("a").unwrap().destroyed);
        assert!(registry.get(&id("a")).is_err());
    }

    #[test]
    fn defaults_apply_to_new_surfaces() {
        let mut host = HeadlessHost::new(1.0);
        let mut registry = SurfaceRegistry::new(SurfaceDefaults {
            device_pixel_ratio: 3.0,
            touch_enabled: true,
        });
        registry
            .create(id("a"), &config(0.0, 0.0, 10.0, 10.0), false, &mut host)
            .unwrap();
        let surface = registry.get(&id("a")).unwrap();
        assert!(surface.is_touch_enabled());
        assert!((surface.device_pixel_ratio() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pause_and_resume_keep_hidden_flags() {
        let mut host = HeadlessHost::new(1.0);
        let mut registry = SurfaceRegistry::default();
        let visible = LogicalRect::new(10.0, 10.0, 50.0, 50.0);
        registry
            .create(id("a"), &SurfaceConfig::new(visible), false, &mut host)
            .unwrap();
        registry
            .create(id("b"), &config(0.0, 0.0, 30.0, 30.0), false, &mut host)
            .unwrap();
        registry.get_mut(&id("b")).unwrap().hide(1.0);

        registry.pause(1.0);
        assert!(registry.is_paused());
        let a = registry.get(&id("a")).unwrap();
        assert!(a.device_bounds(1.0).is_empty());
        assert!(!a.is_hidden());
        assert!(host.content("a").unwrap().paused);
        assert!(host.content("b").unwrap().paused);

        registry.resume(1.0);
        assert_eq!(registry.get(&id("a")).unwrap().bounds(), visible);
        assert!(registry.get(&id("b")).unwrap().is_hidden());
        assert!(registry.get(&id("b")).unwrap().bounds().is_degenerate());
        assert!(!host.content("a").unwrap().paused);
    }

    #[test]
    fn surface_created_while_paused_starts_paused() {
        let mut host = HeadlessHost::new(1.0);
        let mut registry = SurfaceRegistry::default();
        registry.pause(1.0);
        let visible = LogicalRect::new(1.0, 1.0, 5.0, 5.0);
        registry
            .create(id("a"), &SurfaceConfig::new(visible), false, &mut host)
            .unwrap();

        assert!(host.content("a").unwrap().paused);
        assert!(registry.get(&id("a")).unwrap().bounds().is_degenerate());

        registry.resume(1.0);
        assert_eq!(registry.get(&id("a")).unwrap().bounds(), visible);
    }

    #[test]
    fn teardown_releases_everything() {
        let mut host = HeadlessHost::new(1.0);
        let mut registry = SurfaceRegistry::default();
        for name in ["a", "b", "c"] {
            registry
                .create(id(name), &config(0.0, 0.0, 10.0, 10.0), false, &mut host)
                .unwrap();
        }
        registry.teardown();
        assert!(registry.is_empty());
        for name in ["a", "b", "c"] {
            let record = host.content(name).unwrap();
            assert!(record.destroyed);
            assert_eq!(record.destroy_calls, 1);
        }
    }

    #[test]
    fn page_events_are_tagged_with_surface_id() {
        let mut host = HeadlessHost::new(1.0);
        let mut registry = SurfaceRegistry::default();
        let cfg = config(0.0, 0.0, 10.0, 10.0).with_url("https://example.test");
        registry.create(id("w1"), &cfg, false, &mut host).unwrap();

        let events = registry.drain_events();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.surface_id() == &id("w1")));
        assert!(registry.drain_events().is_empty());
    }
}
