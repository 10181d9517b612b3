//! Command validation and dispatch.

use overlay_common::{OverlayError, Result, SurfaceId};
use serde_json::{json, Value};
use tracing::debug;

use super::bridge::Responder;
use super::commands::{
    required_id, required_text, BoundsArgs, Command, CreateArgs, FocusArgs, IdArgs, LoadUrlArgs,
    ScriptArgs,
};
use super::OverlayPlugin;
use crate::host::{InputSink, ScriptCallback, ViewHost};
use crate::surface::SurfaceConfig;

impl<H: ViewHost + InputSink> OverlayPlugin<H> {
    /// Execute one command and answer it through `responder`.
    ///
    /// Everything except `evaluateJavascript` settles before returning.
    pub fn handle(&mut self, command: Command, responder: Responder) {
        debug!(method = command.method(), "command dispatched");

        let result = match command {
            Command::EvaluateJavascript(args) => {
                self.evaluate_command(args, responder);
                return;
            }
            Command::Create(args) => self.create_command(args),
            Command::Destroy(args) => self.destroy_command(args),
            Command::Show(args) => self.with_id(args, |plugin, id| plugin.show_surface(&id)),
            Command::Hide(args) => self.with_id(args, |plugin, id| plugin.hide_surface(&id)),
            Command::OnResize(args) | Command::OnScroll(args) => self.resize_command(args),
            Command::EnableTouch(args) => {
                self.with_id(args, |plugin, id| plugin.set_touch_enabled(&id, true))
            }
            Command::DisableTouch(args) => {
                self.with_id(args, |plugin, id| plugin.set_touch_enabled(&id, false))
            }
            Command::DispatchWebViewEvent(args) => self.focus_command(args),
            Command::LoadUrl(args) => self.load_url_command(args),
            Command::GetCookie(args) => self.get_cookie_command(args),
            Command::SetCookie(args) => self.set_cookie_command(args),
            Command::RemoveAllCookies(_) => self.remove_all_cookies_command(),
            Command::HasCookies(_) => self.has_cookies_command(),
        };

        responder.settle(result);
    }

    fn with_id(
        &mut self,
        args: IdArgs,
        op: impl FnOnce(&mut Self, SurfaceId) -> Result<()>,
    ) -> Result<Option<Value>> {
        let id = required_id(args.id.as_deref())?;
        op(self, id)?;
        Ok(None)
    }

    fn create_command(&mut self, args: CreateArgs) -> Result<Option<Value>> {
        let id = required_id(args.id.as_deref())?;
        let raw = args
            .config
            .as_ref()
            .ok_or_else(|| OverlayError::validation("config object is missing"))?;
        let config = SurfaceConfig::from_raw(raw)?;

        self.create_surface(id, &config, args.force_create.unwrap_or(false))?;
        Ok(None)
    }

    fn destroy_command(&mut self, args: IdArgs) -> Result<Option<Value>> {
        let id = required_id(args.id.as_deref())?;
        self.destroy_surface(&id)?;
        Ok(None)
    }

    fn resize_command(&mut self, args: BoundsArgs) -> Result<Option<Value>> {
        let id = required_id(args.id.as_deref())?;
        self.registry.get(&id)?;
        let bounds = args
            .web_view_bounds
            .as_ref()
            .ok_or_else(|| OverlayError::validation("webViewBounds object is missing"))?
            .to_rect()?;

        self.resize_surface(&id, bounds)?;
        Ok(None)
    }

    fn focus_command(&mut self, args: FocusArgs) -> Result<Option<Value>> {
        let id = required_id(args.id.as_deref())?;
        self.dispatch_focus(&id, args.focus.unwrap_or(false))?;
        Ok(None)
    }

    fn load_url_command(&mut self, args: LoadUrlArgs) -> Result<Option<Value>> {
        let id = required_id(args.id.as_deref())?;
        self.registry.get(&id)?;
        let url = required_text(args.url.as_deref(), "url")?;

        self.load_url(&id, url)?;
        Ok(None)
    }

    fn evaluate_command(&mut self, args: ScriptArgs, responder: Responder) {
        let prepared = required_id(args.id.as_deref()).and_then(|id| {
            self.registry.get(&id)?;
            let script = required_text(args.script.as_deref(), "script")?;
            Ok((id, script.to_string()))
        });
        let (id, script) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => return responder.reject(err),
        };

        let done: ScriptCallback = Box::new(move |outcome| match outcome {
            Ok(Some(value)) => responder.resolve(Some(json!({ "value": value }))),
            Ok(None) => responder.resolve(None),
            Err(err) => responder.reject(OverlayError::from(err)),
        });

        // Existence was checked above; a failure here drops the responder.
        if let Err(err) = self.evaluate_javascript(&id, &script, done) {
            debug!(surface_id = %id, error = %err, "script evaluation not started");
        }
    }
}
