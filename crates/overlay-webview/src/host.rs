//! Capabilities the platform provides: the host view stack, input
//! pipelines, content handles and the cookie store.

use overlay_common::{PixelRect, PlatformError, SurfaceId};

use crate::events::PageListener;
use crate::input::TouchEvent;

/// Completion for an asynchronous script evaluation. Invoked once, on the UI
/// thread, with the script's string result if it produced one.
pub type ScriptCallback = Box<dyn FnOnce(Result<Option<String>, PlatformError>) + Send + 'static>;

/// Something that consumes touch events: the host's default touch handling
/// or a surface's own input pipeline.
pub trait InputSink {
    fn on_touch_event(&mut self, event: &TouchEvent);
}

/// One embedded web-content view.
pub trait ContentHandle: InputSink {
    /// Move the view, in host device pixels.
    fn set_position(&mut self, x: i32, y: i32);
    /// Resize the view, in device pixels. Triggers a layout pass.
    fn set_size(&mut self, width: i32, height: i32);
    fn load_url(&mut self, url: &str) -> Result<(), PlatformError>;
    fn evaluate_script(&mut self, script: &str, done: ScriptCallback);
    fn pause(&mut self);
    fn resume(&mut self);
    /// Release the underlying view. Called at most once.
    fn destroy(&mut self) -> Result<(), PlatformError>;
}

/// The host application's view stack.
pub trait ViewHost {
    /// Display density (device pixels per logical unit) used for placement.
    fn density(&self) -> f64;

    /// Create a content view at `frame` and attach it above the host's own
    /// content view.
    fn attach_content(
        &mut self,
        surface_id: &SurfaceId,
        frame: PixelRect,
        listener: PageListener,
    ) -> Result<Box<dyn ContentHandle>, PlatformError>;
}

/// Platform cookie jar shared by every surface.
pub trait CookieStore {
    /// Full `Cookie` header for `url` (`"k1=v1; k2=v2"`), if any.
    fn cookie(&self, url: &str) -> Result<Option<String>, PlatformError>;
    /// Store a single `key=value` pair for `url`.
    fn set_cookie(&mut self, url: &str, cookie: &str) -> Result<(), PlatformError>;
    fn remove_all(&mut self) -> Result<(), PlatformError>;
    fn has_cookies(&self) -> Result<bool, PlatformError>;
}
