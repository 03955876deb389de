//! Drawing surfaces.
//!
//! [`Canvas`] is the surface widgets paint on. It works in device pixels at
//! the canvas DPI, with the 96-dpi logical variants provided as default
//! methods. Clipping is a single intersected rectangle with a save/restore
//! stack.
//!
//! Two implementations are provided:
//!
//! - [`RasterCanvas`]: software rendering into an RGBA buffer.
//! - [`RecordingCanvas`]: records [`DrawCommand`]s. A recording can be
//!   turned into a [`Metafile`] and replayed onto any other canvas.

use image::imageops::{self, FilterType};
use image::{Pixel as _, Rgba, RgbaImage};

use crate::error::{RenderError, RenderResult};
use crate::image::{Bitmap, Image, Metafile};
use crate::types::{Point, PointPixels, Rectangle, RectanglePixels, SizePixels};

/// A single recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Draw an image at its natural size.
    Image {
        image: Image,
        location: PointPixels,
    },
    /// Draw an image scaled to fill `bounds`.
    ImageStretched {
        image: Image,
        bounds: RectanglePixels,
    },
    /// Intersect the clip with a rectangle.
    IntersectClip(RectanglePixels),
    /// Push the clip state.
    Save,
    /// Pop the clip state.
    Restore,
}

/// A surface that images can be drawn onto.
pub trait Canvas {
    /// The canvas resolution.
    fn dpi(&self) -> i32;

    /// The full drawable area in device pixels.
    fn bounds_pixels(&self) -> RectanglePixels;

    /// The full drawable area in 96-dpi logical units.
    fn bounds(&self) -> Rectangle {
        self.bounds_pixels().to_96dpi(self.dpi())
    }

    /// Draw an image at its natural size, converted to the canvas DPI.
    fn draw_image_pixels(&mut self, image: &Image, location: PointPixels) -> RenderResult<()>;

    /// Draw an image at a logical location.
    fn draw_image(&mut self, image: &Image, location: Point) -> RenderResult<()> {
        let location = location.to_pixels(self.dpi());
        self.draw_image_pixels(image, location)
    }

    /// Draw an image scaled to fill `bounds`.
    fn draw_image_stretched_pixels(
        &mut self,
        image: &Image,
        bounds: RectanglePixels,
    ) -> RenderResult<()>;

    /// Draw an image scaled to fill logical `bounds`.
    fn draw_image_stretched(&mut self, image: &Image, bounds: Rectangle) -> RenderResult<()> {
        let bounds = bounds.to_pixels(self.dpi());
        self.draw_image_stretched_pixels(image, bounds)
    }

    /// Restrict subsequent drawing to the intersection of the current clip and `rect`.
    fn intersect_clip_rect(&mut self, rect: RectanglePixels);

    /// The current clip, or `None` when drawing is unclipped.
    fn clip_bounds(&self) -> Option<RectanglePixels>;

    /// Push the current clip state.
    fn save(&mut self);

    /// Pop the most recently saved clip state.
    fn restore(&mut self) -> RenderResult<()>;
}

/// Save/restore stack shared by both canvas implementations.
#[derive(Debug, Default, Clone)]
struct ClipState {
    current: Option<RectanglePixels>,
    saved: Vec<Option<RectanglePixels>>,
}

impl ClipState {
    fn intersect(&mut self, rect: RectanglePixels) {
        let next = match self.current {
            None => rect,
            Some(current) => current
                .intersect(&rect)
                .unwrap_or(RectanglePixels::new(rect.x, rect.y, 0, 0)),
        };
        self.current = Some(next);
    }

    fn save(&mut self) {
        self.saved.push(self.current);
    }

    fn restore(&mut self) -> RenderResult<()> {
        self.current = self.saved.pop().ok_or(RenderError::StateStackUnderflow)?;
        Ok(())
    }
}

// ============================================================================
// RasterCanvas
// ============================================================================

/// A software canvas drawing into an RGBA buffer.
///
/// Stretched bitmaps are resampled with a triangle filter; pixels are
/// alpha-blended over the existing buffer contents.
pub struct RasterCanvas {
    target: RgbaImage,
    dpi: i32,
    clip: ClipState,
}

impl RasterCanvas {
    /// Create a transparent canvas.
    pub fn new(width: u32, height: u32, dpi: i32) -> RenderResult<Self> {
        Self::from_image(RgbaImage::new(width, height), dpi)
    }

    /// Draw on top of an existing buffer.
    pub fn from_image(target: RgbaImage, dpi: i32) -> RenderResult<Self> {
        if dpi <= 0 {
            return Err(RenderError::InvalidDpi(dpi));
        }
        Ok(Self {
            target,
            dpi,
            clip: ClipState::default(),
        })
    }

    /// The rendered buffer.
    pub fn target(&self) -> &RgbaImage {
        &self.target
    }

    /// Consume the canvas, returning the rendered buffer.
    pub fn into_target(self) -> RgbaImage {
        self.target
    }

    /// Fill the clipped area with a solid color, replacing existing pixels.
    pub fn clear(&mut self, color: Rgba<u8>) {
        if let Some(area) = self.visible_area(self.bounds_pixels()) {
            for y in area.y..area.bottom() {
                for x in area.x..area.right() {
                    self.target.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    /// The part of `rect` that is both on the buffer and inside the clip.
    fn visible_area(&self, rect: RectanglePixels) -> Option<RectanglePixels> {
        let on_buffer = rect.intersect(&self.bounds_pixels())?;
        match self.clip.current {
            Some(clip) => on_buffer.intersect(&clip),
            None => Some(on_buffer),
        }
    }

    fn blit(&mut self, src: &RgbaImage, location: PointPixels) {
        let area = RectanglePixels::from_parts(
            location,
            SizePixels::new(src.width() as i32, src.height() as i32),
        );
        let Some(visible) = self.visible_area(area) else {
            return;
        };
        for y in visible.y..visible.bottom() {
            for x in visible.x..visible.right() {
                let source = src.get_pixel((x - location.x) as u32, (y - location.y) as u32);
                self.target.get_pixel_mut(x as u32, y as u32).blend(source);
            }
        }
    }

    fn draw_bitmap_stretched(&mut self, bitmap: &Bitmap, bounds: RectanglePixels) {
        if bitmap.native_size() == bounds.size() {
            self.blit(bitmap.pixels(), bounds.location());
        } else {
            let scaled = imageops::resize(
                bitmap.pixels(),
                bounds.width as u32,
                bounds.height as u32,
                FilterType::Triangle,
            );
            self.blit(&scaled, bounds.location());
        }
    }

    fn draw_metafile_stretched(
        &mut self,
        metafile: &Metafile,
        bounds: RectanglePixels,
    ) -> RenderResult<()> {
        let frame = metafile.frame();
        if frame.is_empty() {
            return Ok(());
        }

        let base = self.clip.saved.len();
        self.save();
        self.intersect_clip_rect(bounds);
        let replayed = self.replay_commands(metafile, bounds, base + 1);
        // Unwind whatever the metafile left saved, then the replay's own save.
        while self.clip.saved.len() > base {
            self.clip.restore()?;
        }
        replayed
    }

    /// Replay `metafile` scaled into `bounds`. A `Restore` may not pop below
    /// `floor` saved states.
    fn replay_commands(
        &mut self,
        metafile: &Metafile,
        bounds: RectanglePixels,
        floor: usize,
    ) -> RenderResult<()> {
        let frame = metafile.frame();
        let map = |r: RectanglePixels| -> RectanglePixels {
            let sx = |v: i32| (i64::from(v) * i64::from(bounds.width) / i64::from(frame.width)) as i32;
            let sy = |v: i32| (i64::from(v) * i64::from(bounds.height) / i64::from(frame.height)) as i32;
            RectanglePixels::new(bounds.x + sx(r.x), bounds.y + sy(r.y), sx(r.width), sy(r.height))
        };

        for command in metafile.commands() {
            match command {
                DrawCommand::Image { image, location } => {
                    let natural = RectanglePixels::from_parts(*location, image.size_pixels(metafile.dpi()));
                    self.draw_image_stretched_pixels(image, map(natural))?;
                }
                DrawCommand::ImageStretched { image, bounds } => {
                    self.draw_image_stretched_pixels(image, map(*bounds))?;
                }
                DrawCommand::IntersectClip(rect) => self.intersect_clip_rect(map(*rect)),
                DrawCommand::Save => self.save(),
                DrawCommand::Restore => {
                    if self.clip.saved.len() <= floor {
                        return Err(RenderError::StateStackUnderflow);
                    }
                    self.restore()?;
                }
            }
        }
        Ok(())
    }
}

impl Canvas for RasterCanvas {
    fn dpi(&self) -> i32 {
        self.dpi
    }

    fn bounds_pixels(&self) -> RectanglePixels {
        RectanglePixels::new(0, 0, self.target.width() as i32, self.target.height() as i32)
    }

    fn draw_image_pixels(&mut self, image: &Image, location: PointPixels) -> RenderResult<()> {
        let bounds = RectanglePixels::from_parts(location, image.size_pixels(self.dpi));
        self.draw_image_stretched_pixels(image, bounds)
    }

    fn draw_image_stretched_pixels(
        &mut self,
        image: &Image,
        bounds: RectanglePixels,
    ) -> RenderResult<()> {
        tracing::trace!(target: "horizon_trellis_render::canvas", ?bounds, "raster draw image");
        if bounds.is_empty() {
            return Ok(());
        }
        match image {
            Image::Bitmap(bitmap) => {
                self.draw_bitmap_stretched(bitmap, bounds);
                Ok(())
            }
            Image::Metafile(metafile) => self.draw_metafile_stretched(metafile, bounds),
        }
    }

    fn intersect_clip_rect(&mut self, rect: RectanglePixels) {
        self.clip.intersect(rect);
    }

    fn clip_bounds(&self) -> Option<RectanglePixels> {
        self.clip.current
    }

    fn save(&mut self) {
        self.clip.save();
    }

    fn restore(&mut self) -> RenderResult<()> {
        self.clip.restore()
    }
}

// ============================================================================
// RecordingCanvas
// ============================================================================

/// A canvas that records draw commands instead of rasterizing.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    size: SizePixels,
    dpi: i32,
    commands: Vec<DrawCommand>,
    clip: ClipState,
}

impl RecordingCanvas {
    /// Create a recording surface of the given pixel size.
    pub fn new(size: SizePixels, dpi: i32) -> Self {
        Self {
            size,
            dpi,
            commands: Vec::new(),
            clip: ClipState::default(),
        }
    }

    /// The commands recorded so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the canvas empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Turn the recording into a replayable metafile.
    pub fn into_metafile(self) -> RenderResult<Metafile> {
        Metafile::new(self.size, self.dpi, self.commands)
    }
}

impl Canvas for RecordingCanvas {
    fn dpi(&self) -> i32 {
        self.dpi
    }

    fn bounds_pixels(&self) -> RectanglePixels {
        RectanglePixels::from_parts(PointPixels::ZERO, self.size)
    }

    fn draw_image_pixels(&mut self, image: &Image, location: PointPixels) -> RenderResult<()> {
        self.commands.push(DrawCommand::Image {
            image: image.clone(),
            location,
        });
        Ok(())
    }

    fn draw_image_stretched_pixels(
        &mut self,
        image: &Image,
        bounds: RectanglePixels,
    ) -> RenderResult<()> {
        self.commands.push(DrawCommand::ImageStretched {
            image: image.clone(),
            bounds,
        });
        Ok(())
    }

    fn intersect_clip_rect(&mut self, rect: RectanglePixels) {
        self.clip.intersect(rect);
        self.commands.push(DrawCommand::IntersectClip(rect));
    }

    fn clip_bounds(&self) -> Option<RectanglePixels> {
        self.clip.current
    }

    fn save(&mut self) {
        self.clip.save();
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) -> RenderResult<()> {
        self.clip.restore()?;
        self.commands.push(DrawCommand::Restore);
        Ok(())
    }
}
