//! Image handles.
//!
//! An [`Image`] is either a raster [`Bitmap`] or a vector [`Metafile`]
//! (a recorded list of draw commands). Both are cheap to clone: the pixel
//! data and the command list live behind an `Arc`, and equality between
//! images is identity of that shared data, not pixel comparison.

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

use crate::canvas::DrawCommand;
use crate::error::{RenderError, RenderResult};
use crate::types::{Size, SizePixels, BASE_DPI};

/// A raster image with an associated resolution.
#[derive(Clone)]
pub struct Bitmap {
    pixels: Arc<RgbaImage>,
    dpi: i32,
}

impl Bitmap {
    /// Wrap an RGBA buffer rendered at `dpi`.
    pub fn from_rgba(pixels: RgbaImage, dpi: i32) -> RenderResult<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(RenderError::InvalidDimensions {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        if dpi <= 0 {
            return Err(RenderError::InvalidDpi(dpi));
        }
        Ok(Self {
            pixels: Arc::new(pixels),
            dpi,
        })
    }

    /// Create a fully transparent bitmap.
    pub fn new(width: u32, height: u32, dpi: i32) -> RenderResult<Self> {
        Self::from_rgba(RgbaImage::new(width, height), dpi)
    }

    /// Load a bitmap from a file, assuming 96 dpi.
    pub fn from_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let decoded = image::open(path)?;
        Self::from_rgba(decoded.to_rgba8(), BASE_DPI)
    }

    /// Decode a bitmap from encoded bytes, assuming 96 dpi.
    pub fn from_memory(bytes: &[u8]) -> RenderResult<Self> {
        let decoded = image::load_from_memory(bytes)?;
        Self::from_rgba(decoded.to_rgba8(), BASE_DPI)
    }

    /// The underlying pixel buffer.
    #[inline]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// The resolution the bitmap was authored at.
    #[inline]
    pub fn dpi(&self) -> i32 {
        self.dpi
    }

    /// Native size in the bitmap's own pixels.
    #[inline]
    pub fn native_size(&self) -> SizePixels {
        SizePixels::new(self.pixels.width() as i32, self.pixels.height() as i32)
    }

    /// Size in 96-dpi logical units.
    #[inline]
    pub fn size(&self) -> Size {
        self.native_size().to_96dpi(self.dpi)
    }
}

struct MetafileData {
    frame: SizePixels,
    dpi: i32,
    commands: Vec<DrawCommand>,
}

/// A recorded vector image.
///
/// Commands are in the metafile's own pixel space at its recording DPI,
/// with `(0, 0)` to `frame` as the frame. Playback maps that frame onto
/// the destination rectangle. Use
/// [`RecordingCanvas::into_metafile`](crate::canvas::RecordingCanvas::into_metafile)
/// to capture one.
#[derive(Clone)]
pub struct Metafile {
    inner: Arc<MetafileData>,
}

impl Metafile {
    /// Create a metafile from commands recorded at `dpi`.
    pub fn new(frame: SizePixels, dpi: i32, commands: Vec<DrawCommand>) -> RenderResult<Self> {
        if dpi <= 0 {
            return Err(RenderError::InvalidDpi(dpi));
        }
        Ok(Self {
            inner: Arc::new(MetafileData {
                frame,
                dpi,
                commands,
            }),
        })
    }

    /// The frame in recording pixels.
    #[inline]
    pub fn frame(&self) -> SizePixels {
        self.inner.frame
    }

    /// The recording DPI.
    #[inline]
    pub fn dpi(&self) -> i32 {
        self.inner.dpi
    }

    /// The frame size in 96-dpi logical units.
    #[inline]
    pub fn size(&self) -> Size {
        self.inner.frame.to_96dpi(self.inner.dpi)
    }

    /// The recorded commands.
    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.inner.commands
    }
}

/// A drawable image.
#[derive(Clone)]
pub enum Image {
    /// Raster image.
    Bitmap(Bitmap),
    /// Recorded vector image.
    Metafile(Metafile),
}

impl Image {
    /// Size in 96-dpi logical units.
    pub fn size(&self) -> Size {
        match self {
            Self::Bitmap(bitmap) => bitmap.size(),
            Self::Metafile(metafile) => metafile.size(),
        }
    }

    /// Size in device pixels at `dpi`.
    #[inline]
    pub fn size_pixels(&self, dpi: i32) -> SizePixels {
        self.size().to_pixels(dpi)
    }

    /// Whether this is a vector image.
    #[inline]
    pub fn is_metafile(&self) -> bool {
        matches!(self, Self::Metafile(_))
    }

    /// Whether two handles refer to the same image data.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bitmap(a), Self::Bitmap(b)) => Arc::ptr_eq(&a.pixels, &b.pixels) && a.dpi == b.dpi,
            (Self::Metafile(a), Self::Metafile(b)) => Arc::ptr_eq(&a.inner, &b.inner),
            _ => false,
        }
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl From<Bitmap> for Image {
    fn from(bitmap: Bitmap) -> Self {
        Self::Bitmap(bitmap)
    }
}

impl From<Metafile> for Image {
    fn from(metafile: Metafile) -> Self {
        Self::Metafile(metafile)
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bitmap(bitmap) => f
                .debug_struct("Bitmap")
                .field("native_size", &bitmap.native_size())
                .field("dpi", &bitmap.dpi)
                .finish(),
            Self::Metafile(metafile) => f
                .debug_struct("Metafile")
                .field("size", &metafile.size())
                .field("commands", &metafile.commands().len())
                .finish(),
        }
    }
}
