//! A single overlay surface: one content handle plus its geometry,
//! visibility and touch state.

use overlay_common::{LogicalRect, PixelRect, PlatformError, Result, SurfaceId};
use tracing::{debug, warn};

use crate::events::PageListener;
use crate::geometry::scale_rect;
use crate::host::{ContentHandle, ScriptCallback, ViewHost};
use crate::input::TouchEvent;

mod config;

pub use config::{RawBounds, RawSurfaceConfig, SurfaceConfig};

pub struct Surface {
    id: SurfaceId,
    /// Live bounds in host-logical units.
    bounds: LogicalRect,
    /// Most recent non-degenerate bounds; restored by `show` and `resume`.
    last_visible_bounds: LogicalRect,
    /// Device-pixel size last pushed to the content handle.
    applied_size: (i32, i32),
    hidden: bool,
    touch_enabled: bool,
    device_pixel_ratio: f64,
    content: Box<dyn ContentHandle>,
    released: bool,
}

impl Surface {
    /// Attach a new content handle at `config.bounds` and start loading
    /// `config.url`, if any.
    pub fn create(
        id: SurfaceId,
        config: &SurfaceConfig,
        device_pixel_ratio: f64,
        host: &mut dyn ViewHost,
        listener: PageListener,
    ) -> Result<Self> {
        let frame = scale_rect(&config.bounds, host.density());
        let mut content = host.attach_content(&id, frame, listener)?;

        if let Some(url) = &config.url {
            if let Err(e) = content.load_url(url) {
                warn!(surface_id = %id, url = %url, error = %e, "initial load failed");
                if let Err(e) = content.destroy() {
                    warn!(surface_id = %id, error = %e, "failed to release content");
                }
                return Err(e.into());
            }
        }

        debug!(surface_id = %id, ?frame, "surface attached");

        Ok(Self {
            id,
            bounds: config.bounds,
            last_visible_bounds: config.bounds,
            applied_size: frame_size(&frame),
            hidden: false,
            touch_enabled: false,
            device_pixel_ratio,
            content,
            released: false,
        })
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    pub fn bounds(&self) -> LogicalRect {
        self.bounds
    }

    pub fn last_visible_bounds(&self) -> LogicalRect {
        self.last_visible_bounds
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_touch_enabled(&self) -> bool {
        self.touch_enabled
    }

    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.touch_enabled = enabled;
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Current placement in host device pixels.
    pub fn device_bounds(&self, density: f64) -> PixelRect {
        scale_rect(&self.bounds, density)
    }

    /// Single path for every geometry change, including the degenerate
    /// rect used for hide and pause.
    pub fn update_render(&mut self, new_bounds: LogicalRect, density: f64) {
        if !new_bounds.is_degenerate() {
            self.last_visible_bounds = new_bounds;
        }
        self.bounds = new_bounds;

        let frame = scale_rect(&new_bounds, density);
        self.content.set_position(frame.left, frame.top);

        let size = frame_size(&frame);
        if size != self.applied_size {
            self.content.set_size(size.0, size.1);
            self.applied_size = size;
        }
    }

    pub fn show(&mut self, density: f64) {
        self.hidden = false;
        self.update_render(self.last_visible_bounds, density);
    }

    /// Render-time hide: the content keeps running at a zero rect.
    pub fn hide(&mut self, density: f64) {
        self.hidden = true;
        self.update_render(LogicalRect::ZERO, density);
    }

    pub(crate) fn pause(&mut self, density: f64) {
        if !self.hidden {
            self.update_render(LogicalRect::ZERO, density);
        }
        self.content.pause();
    }

    pub(crate) fn resume(&mut self, density: f64) {
        if !self.hidden {
            self.update_render(self.last_visible_bounds, density);
        }
        self.content.resume();
    }

    /// Feed a host-coordinate event into this surface's own input pipeline.
    pub fn deliver(&mut self, event: &TouchEvent, density: f64) {
        let frame = self.device_bounds(density);
        let local = event.offset_by(f64::from(frame.left), f64::from(frame.top));
        self.content.on_touch_event(&local);
    }

    pub fn load_url(&mut self, url: &str) -> std::result::Result<(), PlatformError> {
        debug!(surface_id = %self.id, url, "loading url");
        self.content.load_url(url)
    }

    pub fn evaluate_script(&mut self, script: &str, done: ScriptCallback) {
        self.content.evaluate_script(script, done);
    }

    /// Release the content handle. Later calls are no-ops.
    pub fn destroy(&mut self) -> std::result::Result<(), PlatformError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.content.destroy()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        if let Err(e) = self.destroy() {
            warn!(surface_id = %self.id, error = %e, "failed to release content on drop");
        }
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("bounds", &self.bounds)
            .field("last_visible_bounds", &self.last_visible_bounds)
            .field("hidden", &self.hidden)
            .field("touch_enabled", &self.touch_enabled)
            .field("device_pixel_ratio", &self.device_pixel_ratio)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

fn frame_size(frame: &PixelRect) -> (i32, i32) {
    (frame.width().max(0), frame.height().max(0))
}
