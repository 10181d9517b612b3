use std::error::Error as _;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::id::SurfaceId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("host view is unavailable")]
    HostUnavailable,

    #[error("content error: {0}")]
    Content(String),

    #[error("cookie store error: {0}")]
    Cookies(String),

    #[error("reply channel closed")]
    ChannelClosed,
}

#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("{0}")]
    Validation(String),

    #[error("webView not found: {0}")]
    NotFound(SurfaceId),

    #[error("platform error")]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl OverlayError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable name of the error class, reported to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::Config(_) => "ValidationError",
            Self::NotFound(_) => "NotFound",
            Self::Platform(_) => "PlatformError",
        }
    }
}

/// A rejected command outcome as seen by the controlling application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub message: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl From<&OverlayError> for Rejection {
    fn from(err: &OverlayError) -> Self {
        Self {
            message: err.to_string(),
            kind: err.kind().to_string(),
            cause: err.source().map(|s| s.to_string()),
        }
    }
}

impl From<OverlayError> for Rejection {
    fn from(err: OverlayError) -> Self {
        Self::from(&err)
    }
}
