//! UI-thread façade over the registry, the touch router and the cookie store.
//!
//! `OverlayPlugin` owns all overlay state. It is driven from the UI thread:
//! commands arrive through [`pump`](OverlayPlugin::pump), raw host touches
//! through [`on_host_touch`](OverlayPlugin::on_host_touch) and lifecycle
//! transitions through `on_pause` / `on_resume` / `teardown`.

use overlay_common::{LogicalRect, PixelRect, Result, SurfaceId};
use overlay_config::SurfaceDefaults;
use tracing::debug;

use crate::events::SurfaceEvent;
use crate::headless::InMemoryCookieStore;
use crate::host::{CookieStore, InputSink, ScriptCallback, ViewHost};
use crate::input::TouchEvent;
use crate::registry::{CreateOutcome, SurfaceRegistry};
use crate::router::{RouteOutcome, TouchRouter};
use crate::surface::SurfaceConfig;

mod bridge;
mod commands;
mod cookies;
mod dispatch;
mod lifecycle;


pub use bridge::{
    command_channel, CommandReceiver, PendingCommand, PendingReply, PluginHandle, Reply,
    Responder,
};
pub use commands::{
    BoundsArgs, Command, CreateArgs, FocusArgs, GetCookieArgs, IdArgs, LoadUrlArgs, NoArgs,
    ScriptArgs, SetCookieArgs,
};
pub use cookies::find_cookie_value;

pub struct OverlayPlugin<H: ViewHost + InputSink> {
    host: H,
    registry: SurfaceRegistry,
    router: TouchRouter,
    cookies: Box<dyn CookieStore>,
}

impl<H: ViewHost + InputSink> OverlayPlugin<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, SurfaceDefaults::default())
    }

    pub fn with_config(host: H, defaults: SurfaceDefaults) -> Self {
        Self {
            host,
            registry: SurfaceRegistry::new(defaults),
            router: TouchRouter::new(),
            cookies: Box::new(InMemoryCookieStore::new()),
        }
    }

    pub fn with_cookie_store(mut self, cookies: Box<dyn CookieStore>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    pub fn router(&self) -> &TouchRouter {
        &self.router
    }

    /// Events emitted since the last drain, oldest first.
    pub fn drain_events(&self) -> Vec<SurfaceEvent> {
        self.registry.drain_events()
    }

    /// Run every queued command. Returns how many were handled.
    pub fn pump(&mut self, commands: &mut CommandReceiver) -> usize {
        let mut handled = 0;
        while let Some(pending) = commands.try_next() {
            self.handle(pending.command, pending.responder);
            handled += 1;
        }
        handled
    }

    /// Block the calling thread serving commands until every
    /// [`PluginHandle`] is dropped.
    pub fn run(&mut self, commands: &mut CommandReceiver) {
        while let Some(pending) = commands.blocking_next() {
            self.handle(pending.command, pending.responder);
        }
        debug!("command channel closed");
    }

    // -- surfaces --------------------------------------------------------------

    pub fn create_surface(
        &mut self,
        id: SurfaceId,
        config: &SurfaceConfig,
        force: bool,
    ) -> Result<CreateOutcome> {
        if force && self.registry.contains(&id) {
            self.router.forget(&id);
        }
        self.registry.create(id, config, force, &mut self.host)
    }

    /// Remove a surface. Its buffered touches are dropped, not replayed.
    pub fn destroy_surface(&mut self, id: &SurfaceId) -> Result<()> {
        if self.registry.contains(id) {
            self.router.forget(id);
        }
        self.registry.destroy(id)
    }

    pub fn show_surface(&mut self, id: &SurfaceId) -> Result<()> {
        let density = self.host.density();
        self.registry.get_mut(id)?.show(density);
        Ok(())
    }

    pub fn hide_surface(&mut self, id: &SurfaceId) -> Result<()> {
        let density = self.host.density();
        self.registry.get_mut(id)?.hide(density);
        Ok(())
    }

    pub fn resize_surface(&mut self, id: &SurfaceId, bounds: LogicalRect) -> Result<()> {
        let density = self.host.density();
        self.registry.get_mut(id)?.update_render(bounds, density);
        Ok(())
    }

    pub fn set_touch_enabled(&mut self, id: &SurfaceId, enabled: bool) -> Result<()> {
        self.registry.get_mut(id)?.set_touch_enabled(enabled);
        debug!(surface_id = %id, enabled, "touch interception toggled");
        Ok(())
    }

    pub fn load_url(&mut self, id: &SurfaceId, url: &str) -> Result<()> {
        self.registry.get_mut(id)?.load_url(url)?;
        Ok(())
    }

    /// Start a script evaluation. `done` is dropped unused when `id` is
    /// unknown.
    pub fn evaluate_javascript(
        &mut self,
        id: &SurfaceId,
        script: &str,
        done: ScriptCallback,
    ) -> Result<()> {
        self.registry.get_mut(id)?.evaluate_script(script, done);
        Ok(())
    }

    /// Current placement of a surface in host device pixels.
    pub fn surface_bounds(&self, id: &SurfaceId) -> Result<PixelRect> {
        Ok(self.registry.get(id)?.device_bounds(self.host.density()))
    }

    // -- touch -----------------------------------------------------------------

    /// Entry point for every touch the host surface receives.
    pub fn on_host_touch(&mut self, event: &TouchEvent) -> RouteOutcome {
        let density = self.host.density();
        self.router
            .route(event, &mut self.registry, &mut self.host, density)
    }

    /// Apply the application's focus decision for the buffered gesture.
    pub fn dispatch_focus(&mut self, id: &SurfaceId, focus: bool) -> Result<usize> {
        let density = self.host.density();
        self.router
            .dispatch_focus(id, focus, &mut self.registry, &mut self.host, density)
    }
}

impl<H: ViewHost + InputSink> std::fmt::Debug for OverlayPlugin<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayPlugin")
            .field("registry", &self.registry)
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}
