pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, OverlayError, PlatformError, Rejection};
pub use id::SurfaceId;
pub use types::{LogicalRect, PixelRect};

pub type Result<T> = std::result::Result<T, OverlayError>;
