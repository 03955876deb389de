//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur during image and canvas operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to decode an image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Failed to read an image file.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid image dimensions (zero width or height).
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Invalid DPI value.
    #[error("invalid dpi: {0}")]
    InvalidDpi(i32),

    /// `restore` was called without a matching `save`.
    #[error("canvas state stack underflow")]
    StateStackUnderflow,
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
