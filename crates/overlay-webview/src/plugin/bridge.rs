//! Command transport between the controlling application and the UI thread.
//!
//! `PluginHandle` can be cloned and sent to any thread. Each command travels
//! with a one-shot reply channel; the UI thread drains the queue through
//! [`OverlayPlugin::pump`](super::OverlayPlugin::pump) and every command is
//! answered exactly once through its [`Responder`].

use overlay_common::{OverlayError, PlatformError, Rejection};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::commands::Command;

/// Outcome of a command: resolved with an optional payload, or rejected.
pub type Reply = Result<Option<Value>, Rejection>;

fn closed() -> Rejection {
    Rejection::from(OverlayError::from(PlatformError::ChannelClosed))
}

/// Completes one pending command. Consumed on use.
#[derive(Debug)]
pub struct Responder {
    method: &'static str,
    tx: oneshot::Sender<Reply>,
}

impl Responder {
    /// A responder and the reply it will complete.
    pub fn pair(method: &'static str) -> (Self, PendingReply) {
        let (tx, rx) = oneshot::channel();
        (Self { method, tx }, PendingReply { rx })
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn resolve(self, value: Option<Value>) {
        debug!(method = self.method, "command resolved");
        self.send(Ok(value));
    }

    pub fn reject(self, err: OverlayError) {
        warn!(method = self.method, kind = err.kind(), error = %err, "command rejected");
        self.send(Err(Rejection::from(&err)));
    }

    pub fn settle(self, result: overlay_common::Result<Option<Value>>) {
        match result {
            Ok(value) => self.resolve(value),
            Err(err) => self.reject(err),
        }
    }

    fn send(self, reply: Reply) {
        if self.tx.send(reply).is_err() {
            debug!(method = self.method, "caller stopped waiting for reply");
        }
    }
}

/// The caller's side of a pending command.
#[derive(Debug)]
pub struct PendingReply {
    rx: oneshot::Receiver<Reply>,
}

impl PendingReply {
    pub async fn wait(self) -> Reply {
        self.rx.await.unwrap_or_else(|_| Err(closed()))
    }

    /// Blocking wait. Must not be called from inside an async runtime.
    pub fn blocking_wait(self) -> Reply {
        self.rx.blocking_recv().unwrap_or_else(|_| Err(closed()))
    }

    /// The reply if it has arrived. A responder dropped without answering
    /// yields the closed-channel rejection.
    pub fn try_take(&mut self) -> Option<Reply> {
        match self.rx.try_recv() {
            Ok(reply) => Some(reply),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(closed())),
        }
    }
}

/// A command waiting on the UI thread.
#[derive(Debug)]
pub struct PendingCommand {
    pub command: Command,
    pub responder: Responder,
}

/// Thread-safe entry point for the controlling application.
#[derive(Debug, Clone)]
pub struct PluginHandle {
    tx: mpsc::UnboundedSender<PendingCommand>,
}

impl PluginHandle {
    /// Queue a command for the UI thread.
    pub fn send(&self, command: Command) -> PendingReply {
        let (responder, reply) = Responder::pair(command.method());
        if let Err(mpsc::error::SendError(dropped)) =
            self.tx.send(PendingCommand { command, responder })
        {
            warn!(method = dropped.command.method(), "plugin is gone; command dropped");
        }
        reply
    }

    /// Queue a command and wait for its reply.
    pub async fn call(&self, command: Command) -> Reply {
        self.send(command).wait().await
    }
}

/// UI-thread end of the command queue.
#[derive(Debug)]
pub struct CommandReceiver {
    rx: mpsc::UnboundedReceiver<PendingCommand>,
}

impl CommandReceiver {
    pub fn try_next(&mut self) -> Option<PendingCommand> {
        self.rx.try_recv().ok()
    }

    /// Block until a command arrives. `None` once every handle is dropped.
    pub fn blocking_next(&mut self) -> Option<PendingCommand> {
        self.rx.blocking_recv()
    }
}

pub fn command_channel() -> (PluginHandle, CommandReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (PluginHandle { tx }, CommandReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_reaches_pending_reply() {
        let (responder, mut reply) = Responder::pair("hasCookies");
        assert!(reply.try_take().is_none());
        responder.resolve(Some(serde_json::json!({ "value": true })));
        let value = reply.try_take().unwrap().unwrap().unwrap();
        assert_eq!(value["value"], true);
    }

    #[test]
    fn reject_carries_kind() {
        let (responder, mut reply) = Responder::pair("destroy");
        responder.reject(OverlayError::validation("id is required"));
        let rejection = reply.try_take().unwrap().unwrap_err();
        assert_eq!(rejection.kind, "ValidationError");
        assert_eq!(rejection.message, "id is required");
    }

    #[test]
    fn dropped_responder_reports_closed_channel() {
        let (responder, mut reply) = Responder::pair("evaluateJavascript");
        drop(responder);
        let rejection = reply.try_take().unwrap().unwrap_err();
        assert_eq!(rejection.kind, "PlatformError");
        assert_eq!(rejection.cause.as_deref(), Some("reply channel closed"));
    }

    #[test]
    fn commands_arrive_in_order() {
        let (handle, mut rx) = command_channel();
        let _a = handle.send(Command::show("a"));
        let _b = handle.clone().send(Command::hide("b"));

        assert_eq!(rx.try_next().unwrap().command, Command::show("a"));
        assert_eq!(rx.try_next().unwrap().command, Command::hide("b"));
        assert!(rx.try_next().is_none());
    }

    #[test]
    fn send_after_receiver_dropped_rejects() {
        let (handle, rx) = command_channel();
        drop(rx);
        let mut reply = handle.send(Command::has_cookies());
        assert!(reply.try_take().unwrap().is_err());
    }

    #[tokio::test]
    async fn call_waits_for_ui_thread() {
        let (handle, mut rx) = command_channel();
        let ui = std::thread::spawn(move || {
            let pending = rx.blocking_next().unwrap();
            assert_eq!(pending.command.method(), "hasCookies");
            pending.responder.resolve(Some(serde_json::json!({ "value": false })));
        });

        let reply = handle.call(Command::has_cookies()).await.unwrap().unwrap();
        assert_eq!(reply["value"], false);
        ui.join().unwrap();
    }
}
