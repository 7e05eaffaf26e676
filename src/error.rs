use thiserror::Error;

use crate::color::Color;
use crate::session::Canvas;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Precondition failures raised before any buffer is modified.
///
/// Nothing-to-do situations (a fill that would not change anything, undo on
/// an empty history) are not errors and are reported through return values.
#[derive(Error, Debug)]
pub enum Error {
    #[error("palette has no colors")]
    EmptyPalette,

    #[error("palette label `{0}` is used more than once")]
    DuplicateLabel(String),

    #[error("buffer has zero area")]
    ZeroArea,

    #[error("coordinate ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("tolerance must be a finite, non-negative number")]
    InvalidTolerance,

    #[error("buffer is {actual:?} but {expected:?} was expected")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("raw buffer has {actual} bytes but {expected} were expected")]
    RawLength { expected: usize, actual: usize },

    #[error("color {0} is not in the palette")]
    ColorNotInPalette(Color),

    #[error("pixel ({x}, {y}) has color {color}, which no palette label claims")]
    UnclaimedPixel { x: u32, y: u32, color: Color },

    #[error("invalid hex color `{0}`")]
    InvalidHex(String),

    #[error("unknown color scheme `{0}`")]
    UnknownScheme(String),

    #[error("unknown canvas `{0}`")]
    UnknownCanvas(String),

    #[error("the {0} canvas has no image yet")]
    CanvasUnavailable(Canvas),

    #[error("color count must be at least 1")]
    InvalidColorCount,

    #[error("image has no opaque pixels")]
    NoOpaquePixels,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}
