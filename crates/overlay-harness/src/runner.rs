//! Runs script entries against a headless plugin and writes JSON lines.

use std::io::Write;

use overlay_config::OverlayConfig;
use overlay_webview::headless::HeadlessHost;
use overlay_webview::{
    command_channel, Command, CommandReceiver, OverlayPlugin, PluginHandle, RouteOutcome,
    TouchEvent,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::script::{LifecycleStep, ScriptEntry, ScriptLine};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub entries: usize,
    pub rejected: usize,
    pub invalid_lines: usize,
}

pub struct Runner<W: Write> {
    plugin: OverlayPlugin<HeadlessHost>,
    handle: PluginHandle,
    commands: CommandReceiver,
    out: W,
    summary: RunSummary,
}

impl<W: Write> Runner<W> {
    pub fn new(config: &OverlayConfig, out: W) -> Self {
        let host = HeadlessHost::from_config(&config.host);
        let (handle, commands) = command_channel();
        Self {
            plugin: OverlayPlugin::with_config(host, config.surfaces.clone()),
            handle,
            commands,
            out,
            summary: RunSummary::default(),
        }
    }

    pub fn run(mut self, lines: Vec<ScriptLine>) -> std::io::Result<(RunSummary, W)> {
        for line in lines {
            match line.entry {
                Ok(entry) => self.step(entry)?,
                Err(error) => {
                    warn!(line = line.number, %error, "invalid script line");
                    self.summary.invalid_lines += 1;
                    self.emit(&json!({ "line": line.number, "error": error }))?;
                }
            }
        }

        self.plugin.teardown();
        self.out.flush()?;
        info!(
            entries = self.summary.entries,
            rejected = self.summary.rejected,
            "script finished"
        );
        Ok((self.summary, self.out))
    }

    fn step(&mut self, entry: ScriptEntry) -> std::io::Result<()> {
        self.summary.entries += 1;
        match entry {
            ScriptEntry::Call(command) => self.call(command)?,
            ScriptEntry::Touch(event) => self.touch(&event)?,
            ScriptEntry::Lifecycle(step) => {
                debug!(?step, "lifecycle");
                match step {
                    LifecycleStep::Pause => self.plugin.on_pause(),
                    LifecycleStep::Resume => self.plugin.on_resume(),
                    LifecycleStep::Destroy => self.plugin.teardown(),
                }
            }
        }

        for event in self.plugin.drain_events() {
            let value = serde_json::to_value(&event).map_err(std::io::Error::other)?;
            self.emit(&value)?;
        }
        Ok(())
    }

    fn call(&mut self, command: Command) -> std::io::Result<()> {
        let method = command.method();
        let mut reply = self.handle.send(command);
        self.plugin.pump(&mut self.commands);

        let line = match reply.try_take() {
            Some(Ok(value)) => json!({ "method": method, "resolved": value }),
            Some(Err(rejection)) => {
                self.summary.rejected += 1;
                json!({ "method": method, "rejected": rejection })
            }
            None => json!({ "method": method, "pending": true }),
        };
        self.emit(&line)
    }

    fn touch(&mut self, event: &TouchEvent) -> std::io::Result<()> {
        let outcome = self.plugin.on_host_touch(event);
        let (route, id) = match &outcome {
            RouteOutcome::Host => ("host", None),
            RouteOutcome::Buffered(id) => ("buffered", Some(id)),
            RouteOutcome::Forwarded(id) => ("forwarded", Some(id)),
            RouteOutcome::Returned(id) => ("returned", Some(id)),
        };
        self.emit(&json!({ "touch": event.phase, "route": route, "webViewId": id }))
    }

    fn emit(&mut self, value: &Value) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, value).map_err(std::io::Error::other)?;
        self.out.write_all(b"\n")
    }
}
