//! Overlay web-content surfaces above a host web view.
//!
//! Provides:
//! - Density-correct placement of child surfaces in host-logical coordinates
//! - Touch routing with buffered replay pending a focus decision
//! - An ordered surface registry with pause/resume/teardown
//! - A command bridge that marshals calls onto the UI thread
//! - A headless backend for tests and the scripted harness

pub mod events;
pub mod geometry;
pub mod headless;
pub mod host;
pub mod input;
pub mod plugin;
pub mod registry;
pub mod router;
pub mod surface;

pub use events::{EventQueue, PageListener, SurfaceEvent};
pub use host::{ContentHandle, CookieStore, InputSink, ScriptCallback, ViewHost};
pub use input::{InputSource, TouchEvent, TouchPhase};
pub use plugin::{command_channel, Command, CommandReceiver, OverlayPlugin, PluginHandle, Reply};
pub use registry::{CreateOutcome, SurfaceRegistry};
pub use router::{GestureState, RouteOutcome, TouchRouter};
pub use surface::{RawBounds, RawSurfaceConfig, Surface, SurfaceConfig};
