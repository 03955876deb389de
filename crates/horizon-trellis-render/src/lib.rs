//! Geometry, images and drawing surfaces for Horizon Trellis.
//!
//! This crate provides:
//!
//! - **Geometry**: 96-dpi logical types ([`Size`], [`Point`], [`Rectangle`])
//!   and device pixel types ([`SizePixels`], [`PointPixels`], [`RectanglePixels`])
//!   with DPI conversion helpers
//! - **Images**: shared [`Bitmap`] and [`Metafile`] handles behind one [`Image`] type
//! - **Canvas**: the [`Canvas`] drawing trait with a software
//!   [`RasterCanvas`] and a command-recording [`RecordingCanvas`]
//!
//! # Example
//!
//! ```
//! use horizon_trellis_render::{Bitmap, Canvas, Image, PointPixels, RasterCanvas};
//!
//! let image: Image = Bitmap::new(16, 16, 96).unwrap().into();
//! let mut canvas = RasterCanvas::new(64, 64, 96).unwrap();
//! canvas.draw_image_pixels(&image, PointPixels::new(8, 8)).unwrap();
//! ```

pub mod canvas;
mod error;
pub mod image;
pub mod types;

pub use canvas::{Canvas, DrawCommand, RasterCanvas, RecordingCanvas};
pub use error::{RenderError, RenderResult};
pub use crate::image::{Bitmap, Image, Metafile};
pub use types::{
    int_from_96dpi, int_to_96dpi, Pixel, Point, PointPixels, Rectangle, RectanglePixels, Size,
    SizePixels, BASE_DPI,
};
