//! In-memory host and content backends.
//!
//! `HeadlessHost` stands in for a platform view stack: it records every
//! call a surface makes on its content handle so behavior can be observed
//! without a display. Used by the harness binary and by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use overlay_common::{PixelRect, PlatformError, SurfaceId};
use overlay_config::HostConfig;
use tracing::debug;

use crate::events::PageListener;
use crate::host::{ContentHandle, CookieStore, InputSink, ScriptCallback, ViewHost};
use crate::input::TouchEvent;

/// Everything observed on one content handle.
#[derive(Debug, Clone)]
pub struct ContentRecord {
    pub surface_id: SurfaceId,
    /// Frame the content was attached at.
    pub frame: PixelRect,
    pub position: (i32, i32),
    pub size: (i32, i32),
    /// Number of `set_size` calls (layout passes).
    pub size_changes: usize,
    pub urls: Vec<String>,
    pub scripts: Vec<String>,
    /// Touches delivered into the content, in surface-local pixels.
    pub touches: Vec<TouchEvent>,
    pub paused: bool,
    pub destroyed: bool,
    pub destroy_calls: usize,
}

impl ContentRecord {
    fn attached(surface_id: SurfaceId, frame: PixelRect) -> Self {
        Self {
            surface_id,
            frame,
            position: (frame.left, frame.top),
            size: (frame.width().max(0), frame.height().max(0)),
            size_changes: 0,
            urls: Vec::new(),
            scripts: Vec::new(),
            touches: Vec::new(),
            paused: false,
            destroyed: false,
            destroy_calls: 0,
        }
    }
}

type SharedRecord = Arc<Mutex<ContentRecord>>;

fn lock(record: &SharedRecord) -> MutexGuard<'_, ContentRecord> {
    record.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub struct HeadlessHost {
    density: f64,
    available: bool,
    /// Every content ever attached, in attach order.
    contents: Vec<SharedRecord>,
    /// Events that reached the host's default touch handling.
    touches: Vec<TouchEvent>,
    /// Shared with every content; the next `destroy` fails and clears it.
    fail_destroy: Arc<AtomicBool>,
}

impl HeadlessHost {
    pub fn new(density: f64) -> Self {
        Self {
            density,
            available: true,
            contents: Vec::new(),
            touches: Vec::new(),
            fail_destroy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn from_config(config: &HostConfig) -> Self {
        let mut host = Self::new(config.density);
        host.available = config.available;
        host
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Make the next content release fail with a platform error.
    pub fn fail_next_destroy(&self) {
        self.fail_destroy.store(true, Ordering::SeqCst);
    }

    pub fn host_touches(&self) -> &[TouchEvent] {
        &self.touches
    }

    /// Snapshot of the most recently attached content for `id`.
    pub fn content(&self, id: &str) -> Option<ContentRecord> {
        self.contents
            .iter()
            .rev()
            .map(lock)
            .find(|r| r.surface_id.as_str() == id)
            .map(|r| r.clone())
    }

    /// Snapshots of every content ever attached for `id`, oldest first.
    pub fn contents_for(&self, id: &str) -> Vec<ContentRecord> {
        self.contents
            .iter()
            .map(lock)
            .filter(|r| r.surface_id.as_str() == id)
            .map(|r| r.clone())
            .collect()
    }

    pub fn attached_count(&self) -> usize {
        self.contents.len()
    }
}

impl ViewHost for HeadlessHost {
    fn density(&self) -> f64 {
        self.density
    }

    fn attach_content(
        &mut self,
        surface_id: &SurfaceId,
        frame: PixelRect,
        listener: PageListener,
    ) -> Result<Box<dyn ContentHandle>, PlatformError> {
        if !self.available {
            return Err(PlatformError::HostUnavailable);
        }

        let record = Arc::new(Mutex::new(ContentRecord::attached(
            surface_id.clone(),
            frame,
        )));
        self.contents.push(Arc::clone(&record));

        Ok(Box::new(HeadlessContent {
            record,
            listener,
            fail_destroy: Arc::clone(&self.fail_destroy),
        }))
    }
}

impl InputSink for HeadlessHost {
    fn on_touch_event(&mut self, event: &TouchEvent) {
        self.touches.push(event.clone());
    }
}

/// Content handle that records calls and completes loads immediately.
pub struct HeadlessContent {
    record: SharedRecord,
    listener: PageListener,
    fail_destroy: Arc<AtomicBool>,
}

impl InputSink for HeadlessContent {
    fn on_touch_event(&mut self, event: &TouchEvent) {
        lock(&self.record).touches.push(event.clone());
    }
}

impl ContentHandle for HeadlessContent {
    fn set_position(&mut self, x: i32, y: i32) {
        lock(&self.record).position = (x, y);
    }

    fn set_size(&mut self, width: i32, height: i32) {
        let mut record = lock(&self.record);
        record.size = (width, height);
        record.size_changes += 1;
    }

    fn load_url(&mut self, url: &str) -> Result<(), PlatformError> {
        if !(url.contains("://") || url.starts_with("about:")) {
            return Err(PlatformError::Content(format!("cannot load {url:?}")));
        }
        lock(&self.record).urls.push(url.to_string());

        self.listener.page_started();
        self.listener.progress_changed(100);
        self.listener.page_finished();
        Ok(())
    }

    fn evaluate_script(&mut self, script: &str, done: ScriptCallback) {
        lock(&self.record).scripts.push(script.to_string());
        let value = match script.trim() {
            "void 0" => None,
            other => Some(other.to_string()),
        };
        done(Ok(value));
    }

    fn pause(&mut self) {
        lock(&self.record).paused = true;
    }

    fn resume(&mut self) {
        lock(&self.record).paused = false;
    }

    fn destroy(&mut self) -> Result<(), PlatformError> {
        let mut record = lock(&self.record);
        record.destroy_calls += 1;
        if self.fail_destroy.swap(false, Ordering::SeqCst) {
            return Err(PlatformError::Content("content release failed".into()));
        }
        if record.destroyed {
            return Err(PlatformError::Content("content already destroyed".into()));
        }
        record.destroyed = true;
        debug!(surface_id = %record.surface_id, "headless content destroyed");
        Ok(())
    }
}

/// Cookie jar keyed by exact URL, preserving insertion order per URL.
#[derive(Debug, Default)]
pub struct InMemoryCookieStore {
    jars: HashMap<String, Vec<(String, String)>>,
}

impl InMemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for InMemoryCookieStore {
    fn cookie(&self, url: &str) -> Result<Option<String>, PlatformError> {
        Ok(self.jars.get(url).filter(|jar| !jar.is_empty()).map(|jar| {
            jar.iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ")
        }))
    }

    fn set_cookie(&mut self, url: &str, cookie: &str) -> Result<(), PlatformError> {
        let (key, value) = cookie
            .split_once('=')
            .ok_or_else(|| PlatformError::Cookies(format!("malformed cookie {cookie:?}")))?;
        let jar = self.jars.entry(url.to_string()).or_default();
        match jar.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => jar.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn remove_all(&mut self) -> Result<(), PlatformError> {
        self.jars.clear();
        Ok(())
    }

    fn has_cookies(&self) -> Result<bool, PlatformError> {
        Ok(self.jars.values().any(|jar| !jar.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventQueue, SurfaceEvent};

    #[test]
    fn unavailable_host_refuses_attach() {
        let mut host = HeadlessHost::new(1.0);
        host.set_available(false);
        let events = EventQueue::new();
        let id = SurfaceId::from("w1");
        let result = host.attach_content(&id, PixelRect::default(), events.listener(id.clone()));
        assert!(matches!(result, Err(PlatformError::HostUnavailable)));
    }

    #[test]
    fn load_emits_page_lifecycle() {
        let mut host = HeadlessHost::new(1.0);
        let events = EventQueue::new();
        let id = SurfaceId::from("w1");
        let mut content = host
            .attach_content(&id, PixelRect::new(0, 0, 10, 10), events.listener(id.clone()))
            .unwrap();
        content.load_url("https://example.test").unwrap();

        let drained = events.drain();
        assert!(matches!(drained[0], SurfaceEvent::PageStarted { .. }));
        assert!(matches!(
            drained[1],
            SurfaceEvent::ProgressChanged { new_progress: 100, .. }
        ));
        assert!(matches!(drained[2], SurfaceEvent::PageFinished { .. }));
        assert_eq!(host.content("w1").unwrap().urls, vec!["https://example.test"]);
    }

    #[test]
    fn script_without_value_completes_with_none() {
        let mut host = HeadlessHost::new(1.0);
        let events = EventQueue::new();
        let id = SurfaceId::from("w1");
        let mut content = host
            .attach_content(&id, PixelRect::default(), events.listener(id.clone()))
            .unwrap();

        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        content.evaluate_script(
            "void 0",
            Box::new(move |r| *sink.lock().unwrap() = Some(r.unwrap())),
        );
        assert_eq!(*seen.lock().unwrap(), Some(None));
    }

    #[test]
    fn fail_next_destroy_applies_once() {
        let mut host = HeadlessHost::new(1.0);
        let events = EventQueue::new();
        let id = SurfaceId::from("w1");
        let mut first = host
            .attach_content(&id, PixelRect::default(), events.listener(id.clone()))
            .unwrap();
        let mut second = host
            .attach_content(&id, PixelRect::default(), events.listener(id.clone()))
            .unwrap();

        host.fail_next_destroy();
        assert!(matches!(first.destroy(), Err(PlatformError::Content(_))));
        assert!(second.destroy().is_ok());

        let records = host.contents_for("w1");
        assert!(!records[0].destroyed);
        assert_eq!(records[0].destroy_calls, 1);
        assert!(records[1].destroyed);
    }

    #[test]
    fn attached_record_starts_at_frame() {
        let mut host = HeadlessHost::new(1.0);
        let events = EventQueue::new();
        let id = SurfaceId::from("w1");
        host.attach_content(&id, PixelRect::new(5, 6, 25, 16), events.listener(id.clone()))
            .unwrap();

        let record = host.content("w1").unwrap();
        assert_eq!(record.position, (5, 6));
        assert_eq!(record.size, (20, 10));
        assert_eq!(record.size_changes, 0);
        assert!(!record.paused && !record.destroyed);
    }

    #[test]
    fn cookie_store_replaces_existing_key() {
        let mut store = InMemoryCookieStore::new();
        store.set_cookie("https://a.test", "token=1").unwrap();
        store.set_cookie("https://a.test", "lang=en").unwrap();
        store.set_cookie("https://a.test", "token=2").unwrap();
        assert_eq!(
            store.cookie("https://a.test").unwrap().as_deref(),
            Some("token=2; lang=en")
        );
        assert!(store.cookie("https://b.test").unwrap().is_none());
    }

    #[test]
    fn cookie_store_remove_all() {
        let mut store = InMemoryCookieStore::new();
        assert!(!store.has_cookies().unwrap());
        store.set_cookie("https://a.test", "k=v").unwrap();
        assert!(store.has_cookies().unwrap());
        store.remove_all().unwrap();
        assert!(!store.has_cookies().unwrap());
    }
}
