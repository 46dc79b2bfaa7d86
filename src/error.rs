use thiserror::Error;

use crate::geometry::PixelRect;

/// Everything that can stop a trail build.
///
/// Disabled builds and missing sprites are not errors; they come back as
/// `Ok(None)` from [`crate::trail::MeleeWeaponTrail::build`].
#[derive(Debug, Error)]
pub enum TrailError {
    /// The sprite's texture is not CPU-readable. The caller must read it back
    /// before building.
    #[error("texture '{0}' is not readable")]
    Unreadable(String),

    #[error("rect {rect:?} does not fit inside {bounds_w}x{bounds_h}")]
    RectOutOfBounds {
        rect: PixelRect,
        bounds_w: u32,
        bounds_h: u32,
    },

    #[error("pixel data has {actual} entries, expected {expected} ({width}x{height})")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("unknown sprite frame '{0}'")]
    UnknownFrame(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
