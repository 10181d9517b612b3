//! Host lifecycle transitions.

use tracing::info;

use super::OverlayPlugin;
use crate::host::{InputSink, ViewHost};

impl<H: ViewHost + InputSink> OverlayPlugin<H> {
    /// The host went to the background: collapse visible surfaces and pause
    /// their content. Hidden flags are untouched.
    pub fn on_pause(&mut self) {
        let density = self.host.density();
        self.registry.pause(density);
    }

    /// Restore every visible surface to its last visible bounds and resume
    /// content.
    pub fn on_resume(&mut self) {
        let density = self.host.density();
        self.registry.resume(density);
    }

    /// Release every surface and drop all touch state. The plugin stays
    /// usable afterwards.
    pub fn teardown(&mut self) {
        self.router.clear();
        self.registry.teardown();
        info!("overlay plugin torn down");
    }
}
