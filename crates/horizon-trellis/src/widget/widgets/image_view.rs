//! Image display widget.
//!
//! The [`ImageView`] paints a single [`Image`] inside its client area minus
//! a margin, fitted according to an [`ImageViewMode`].
//!
//! # Example
//!
//! ```
//! use horizon_trellis::config::ToolkitConfig;
//! use horizon_trellis::render::{Bitmap, RecordingCanvas, DrawCommand, RectanglePixels, SizePixels};
//! use horizon_trellis::toolkit::Toolkit;
//! use horizon_trellis::widget::Widget;
//! use horizon_trellis::widget::widgets::{ImageView, ImageViewMode};
//!
//! let toolkit = Toolkit::init(ToolkitConfig::default()).unwrap();
//! let mut view = ImageView::new(&toolkit).unwrap();
//! view.set_mode(ImageViewMode::Shrink);
//! view.set_image(Some(Bitmap::new(200, 100, 96).unwrap().into()));
//! view.widget_base_mut().set_bounds(RectanglePixels::new(0, 0, 100, 100));
//!
//! let mut canvas = RecordingCanvas::new(SizePixels::new(100, 100), 96);
//! view.paint(&mut canvas).unwrap();
//! assert!(matches!(
//!     canvas.commands()[0],
//!     DrawCommand::ImageStretched { bounds, .. } if bounds == RectanglePixels::new(0, 25, 100, 50)
//! ));
//! ```

use horizon_trellis_core::logging::{span_names, targets};
use horizon_trellis_core::{Object, ObjectId, PerfSpan, Signal};
use horizon_trellis_render::{
    Canvas, Image, Pixel, PointPixels, RectanglePixels, RenderResult, Size, SizePixels, int_from_96dpi,
};
use serde::{Deserialize, Serialize};

use crate::error::WidgetError;
use crate::toolkit::Toolkit;
use crate::widget::layout::{Geometry, LayoutContext, LayoutFlags, LayoutItem};
use crate::widget::{Widget, WidgetBase};

/// Ideal size of an image view that does not size itself to its image.
const DEFAULT_IDEAL_SIZE: Size = Size::new(100, 100);

/// How the image is fitted into the client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageViewMode {
    /// The view sizes itself to the image and draws it at natural size.
    #[default]
    Ideal,
    /// Natural size at the top-left corner, clipped.
    Corner,
    /// Natural size centered, clipped.
    Center,
    /// Scaled down to fit when larger than the client area, centered.
    Shrink,
    /// Scaled up or down to fit, keeping the aspect ratio, centered.
    Zoom,
    /// Scaled to fill the client area, ignoring the aspect ratio.
    Stretch,
}

/// A widget that displays an image.
pub struct ImageView {
    base: WidgetBase,
    image: Option<Image>,
    mode: ImageViewMode,
    /// 96-dpi units.
    margin: i32,

    /// Signal emitted when the image changes.
    pub image_changed: Signal<()>,

    /// Signal emitted when the margin changes.
    pub margin_changed: Signal<()>,
}

impl ImageView {
    /// The registered class name.
    pub const CLASS_NAME: &'static str = "ImageView";

    /// Create an empty image view in [`ImageViewMode::Ideal`] with no margin.
    pub fn new(toolkit: &Toolkit) -> Result<Self, WidgetError> {
        Ok(Self {
            base: WidgetBase::new(toolkit, Self::CLASS_NAME)?,
            image: None,
            mode: ImageViewMode::Ideal,
            margin: 0,
            image_changed: Signal::new(),
            margin_changed: Signal::new(),
        })
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// The fit mode.
    #[inline]
    pub fn mode(&self) -> ImageViewMode {
        self.mode
    }

    /// Set the fit mode.
    pub fn set_mode(&mut self, mode: ImageViewMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.base.request_repaint();
        self.base.request_layout();
    }

    /// The displayed image.
    #[inline]
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// Set the displayed image.
    ///
    /// Images compare by identity, so setting the same handle again does
    /// nothing. In ideal mode a change of image size requests a re-layout.
    pub fn set_image(&mut self, image: Option<Image>) {
        if self.image == image {
            return;
        }

        let old_size = self.image.as_ref().map_or(Size::ZERO, Image::size);
        let new_size = image.as_ref().map_or(Size::ZERO, Image::size);

        self.base
            .set_clears_background(image.as_ref().is_some_and(Image::is_metafile));
        self.image = image;

        self.base.request_repaint();
        if self.mode == ImageViewMode::Ideal && old_size != new_size {
            self.base.request_layout();
        }

        self.image_changed.emit(());
    }

    /// The margin around the image in 96-dpi units.
    #[inline]
    pub fn margin(&self) -> i32 {
        self.margin
    }

    /// Set the margin around the image in 96-dpi units.
    pub fn set_margin(&mut self, margin: i32) {
        if self.margin == margin {
            return;
        }
        self.margin = margin;

        self.base.request_repaint();
        if self.mode == ImageViewMode::Ideal {
            self.base.request_layout();
        }

        self.margin_changed.emit(());
    }

    /// Where the image lands for a given client area, in paint order.
    fn placement(&self, image: &Image) -> Placement {
        let dpi = self.base.dpi();
        let margin = int_from_96dpi(self.margin, dpi);
        let client = self.base.client_size();
        let area = SizePixels::new((client.width - 2 * margin).max(0), (client.height - 2 * margin).max(0));
        let size = image.size_pixels(dpi);

        match self.mode {
            ImageViewMode::Stretch => {
                Placement::Stretched(RectanglePixels::new(margin, margin, area.width, area.height))
            }
            ImageViewMode::Shrink | ImageViewMode::Zoom => {
                let fits = size.width <= area.width && size.height <= area.height;
                let scale = if size.is_empty() || (self.mode == ImageViewMode::Shrink && fits) {
                    1.0
                } else {
                    let sx = f64::from(area.width) / f64::from(size.width);
                    let sy = f64::from(area.height) / f64::from(size.height);
                    sx.min(sy)
                };
                let width = (f64::from(size.width) * scale) as Pixel;
                let height = (f64::from(size.height) * scale) as Pixel;
                Placement::Stretched(RectanglePixels::new(
                    margin + (area.width - width) / 2,
                    margin + (area.height - height) / 2,
                    width,
                    height,
                ))
            }
            ImageViewMode::Ideal => Placement::Natural {
                location: PointPixels::new(margin, margin),
                clip: None,
            },
            ImageViewMode::Corner => Placement::Natural {
                location: PointPixels::new(margin, margin),
                clip: Some(RectanglePixels::new(margin, margin, area.width, area.height)),
            },
            ImageViewMode::Center => Placement::Natural {
                location: PointPixels::new(
                    margin + (area.width - size.width) / 2,
                    margin + (area.height - size.height) / 2,
                ),
                clip: Some(RectanglePixels::new(margin, margin, area.width, area.height)),
            },
        }
    }
}

enum Placement {
    Stretched(RectanglePixels),
    Natural {
        location: PointPixels,
        clip: Option<RectanglePixels>,
    },
}

impl Object for ImageView {
    fn object_id(&self) -> ObjectId {
        self.base.object_id()
    }
}

impl Widget for ImageView {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn create_layout_item(&self, ctx: &LayoutContext) -> Box<dyn LayoutItem> {
        let dpi = ctx.dpi();

        let (flags, ideal, min) = if self.mode == ImageViewMode::Ideal {
            let ideal = match &self.image {
                Some(image) => {
                    let size = image.size();
                    Size::new(size.width + 2 * self.margin, size.height + 2 * self.margin).to_pixels(dpi)
                }
                None => DEFAULT_IDEAL_SIZE.to_pixels(dpi),
            };
            (LayoutFlags::empty(), ideal, ideal)
        } else {
            let side = 2 * int_from_96dpi(self.margin, dpi) + 1;
            (LayoutFlags::all(), DEFAULT_IDEAL_SIZE.to_pixels(dpi), SizePixels::new(side, side))
        };

        Box::new(ImageViewLayoutItem {
            geometry: self.base.layout_geometry(dpi),
            flags,
            ideal,
            min,
        })
    }

    fn paint(&self, canvas: &mut dyn Canvas) -> RenderResult<()> {
        let Some(image) = &self.image else {
            return Ok(());
        };
        let _span = PerfSpan::new(span_names::PAINT);

        match self.placement(image) {
            Placement::Stretched(bounds) => {
                tracing::trace!(target: targets::WIDGET, mode = ?self.mode, ?bounds, "painting scaled image");
                canvas.draw_image_stretched_pixels(image, bounds)
            }
            Placement::Natural { location, clip: None } => canvas.draw_image_pixels(image, location),
            Placement::Natural {
                location,
                clip: Some(clip),
            } => {
                canvas.save();
                canvas.intersect_clip_rect(clip);
                let drawn = canvas.draw_image_pixels(image, location);
                canvas.restore()?;
                drawn
            }
        }
    }
}

static_assertions::assert_impl_all!(ImageView: Send, Sync);

/// Layout item of an [`ImageView`].
#[derive(Debug, Clone)]
struct ImageViewLayoutItem {
    geometry: Geometry,
    flags: LayoutFlags,
    ideal: SizePixels,
    min: SizePixels,
}

impl LayoutItem for ImageViewLayoutItem {
    fn layout_flags(&self) -> LayoutFlags {
        self.flags
    }

    fn ideal_size(&self) -> SizePixels {
        self.ideal
    }

    fn min_size(&self) -> SizePixels {
        self.min
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolkitConfig;
    use horizon_trellis_render::{Bitmap, DrawCommand, Metafile, RecordingCanvas};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn toolkit() -> Toolkit {
        let mut config = ToolkitConfig::default();
        config.layout.parallel_rows = false;
        Toolkit::init(config).unwrap()
    }

    fn bitmap(width: u32, height: u32) -> Image {
        Bitmap::new(width, height, 96).unwrap().into()
    }

    fn view(toolkit: &Toolkit, mode: ImageViewMode, image: Image, client: Pixel) -> ImageView {
        let mut view = ImageView::new(toolkit).unwrap();
        view.set_mode(mode);
        view.set_image(Some(image));
        view.widget_base_mut()
            .set_bounds(RectanglePixels::new(0, 0, client, client));
        view
    }

    fn paint(view: &ImageView) -> Vec<DrawCommand> {
        let mut canvas = RecordingCanvas::new(view.widget_base().client_size(), 96);
        view.paint(&mut canvas).unwrap();
        canvas.take_commands()
    }

    fn counter(signal: &Signal<()>) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        signal.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_shrink_scales_large_image() {
        let toolkit = toolkit();
        let image = bitmap(200, 100);
        let view = view(&toolkit, ImageViewMode::Shrink, image.clone(), 100);
        assert_eq!(
            paint(&view),
            vec![DrawCommand::ImageStretched {
                image,
                bounds: RectanglePixels::new(0, 25, 100, 50),
            }]
        );
    }

    #[test]
    fn test_shrink_keeps_small_image_at_natural_size() {
        let toolkit = toolkit();
        let image = bitmap(40, 20);
        let view = view(&toolkit, ImageViewMode::Shrink, image.clone(), 100);
        assert_eq!(
            paint(&view),
            vec![DrawCommand::ImageStretched {
                image,
                bounds: RectanglePixels::new(30, 40, 40, 20),
            }]
        );
    }

    #[test]
    fn test_zoom_scales_small_image_up() {
        let toolkit = toolkit();
        let image = bitmap(40, 20);
        let mut view = view(&toolkit, ImageViewMode::Zoom, image.clone(), 100);
        view.set_margin(5);
        // 90x90 area, scale 2.25
        assert_eq!(
            paint(&view),
            vec![DrawCommand::ImageStretched {
                image,
                bounds: RectanglePixels::new(5, 27, 90, 45),
            }]
        );
    }

    #[test]
    fn test_stretch_fills_client_minus_margin() {
        let toolkit = toolkit();
        let image = bitmap(10, 30);
        let mut view = view(&toolkit, ImageViewMode::Stretch, image.clone(), 100);
        view.set_margin(10);
        assert_eq!(
            paint(&view),
            vec![DrawCommand::ImageStretched {
                image,
                bounds: RectanglePixels::new(10, 10, 80, 80),
            }]
        );
    }

    #[test]
    fn test_center_clips_and_centers() {
        let toolkit = toolkit();
        let image = bitmap(40, 200);
        let mut view = view(&toolkit, ImageViewMode::Center, image.clone(), 100);
        view.set_margin(2);
        assert_eq!(
            paint(&view),
            vec![
                DrawCommand::Save,
                DrawCommand::IntersectClip(RectanglePixels::new(2, 2, 96, 96)),
                DrawCommand::Image {
                    image,
                    location: PointPixels::new(30, -50),
                },
                DrawCommand::Restore,
            ]
        );
    }

    #[test]
    fn test_corner_and_ideal_draw_at_margin() {
        let toolkit = toolkit();
        let image = bitmap(40, 20);
        let mut view = view(&toolkit, ImageViewMode::Corner, image.clone(), 100);
        view.set_margin(3);
        let commands = paint(&view);
        assert_eq!(commands.len(), 4);
        assert_eq!(
            commands[2],
            DrawCommand::Image {
                image: image.clone(),
                location: PointPixels::new(3, 3),
            }
        );

        view.set_mode(ImageViewMode::Ideal);
        assert_eq!(
            paint(&view),
            vec![DrawCommand::Image {
                image,
                location: PointPixels::new(3, 3),
            }]
        );
    }

    #[test]
    fn test_no_image_paints_nothing() {
        let toolkit = toolkit();
        let view = ImageView::new(&toolkit).unwrap();
        assert!(paint(&view).is_empty());
    }

    #[test]
    fn test_layout_item_ideal_mode() {
        let toolkit = toolkit();
        let mut view = ImageView::new(&toolkit).unwrap();
        let ctx = LayoutContext::new(96);

        let item = view.create_layout_item(&ctx);
        assert!(item.layout_flags().is_empty());
        assert_eq!(item.ideal_size(), SizePixels::new(100, 100));

        view.set_image(Some(bitmap(64, 32)));
        view.set_margin(4);
        let item = view.create_layout_item(&ctx);
        assert_eq!(item.ideal_size(), SizePixels::new(72, 40));
        assert_eq!(item.min_size(), SizePixels::new(72, 40));
    }

    #[test]
    fn test_layout_item_scaling_modes() {
        let toolkit = toolkit();
        let mut view = ImageView::new(&toolkit).unwrap();
        view.set_mode(ImageViewMode::Zoom);
        view.set_margin(4);

        let item = view.create_layout_item(&LayoutContext::new(192));
        assert_eq!(item.layout_flags(), LayoutFlags::all());
        assert_eq!(item.ideal_size(), SizePixels::new(200, 200));
        assert_eq!(item.min_size(), SizePixels::new(17, 17));
    }

    #[test]
    fn test_set_image_is_identity_based() {
        let toolkit = toolkit();
        let mut view = ImageView::new(&toolkit).unwrap();
        let changes = counter(&view.image_changed);
        let layouts = counter(&view.widget_base().layout_requested);

        let image = bitmap(10, 10);
        view.set_image(Some(image.clone()));
        view.set_image(Some(image));
        assert_eq!(changes.load(Ordering::SeqCst), 1);
        assert_eq!(layouts.load(Ordering::SeqCst), 1);

        // Same size, different handle: changed, but no re-layout.
        view.set_image(Some(bitmap(10, 10)));
        assert_eq!(changes.load(Ordering::SeqCst), 2);
        assert_eq!(layouts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_image_outside_ideal_mode_skips_layout() {
        let toolkit = toolkit();
        let mut view = ImageView::new(&toolkit).unwrap();
        view.set_mode(ImageViewMode::Stretch);
        let layouts = counter(&view.widget_base().layout_requested);
        let repaints = counter(&view.widget_base().repaint_requested);

        view.set_image(Some(bitmap(10, 10)));
        assert_eq!(layouts.load(Ordering::SeqCst), 0);
        assert_eq!(repaints.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_margin() {
        let toolkit = toolkit();
        let mut view = ImageView::new(&toolkit).unwrap();
        let changes = counter(&view.margin_changed);
        let layouts = counter(&view.widget_base().layout_requested);

        view.set_margin(5);
        view.set_margin(5);
        assert_eq!(changes.load(Ordering::SeqCst), 1);
        assert_eq!(layouts.load(Ordering::SeqCst), 1);

        view.set_mode(ImageViewMode::Shrink);
        view.set_margin(6);
        assert_eq!(changes.load(Ordering::SeqCst), 2);
        // One from the mode change only.
        assert_eq!(layouts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_set_mode_requests_repaint_and_layout() {
        let toolkit = toolkit();
        let mut view = ImageView::new(&toolkit).unwrap();
        let layouts = counter(&view.widget_base().layout_requested);
        let repaints = counter(&view.widget_base().repaint_requested);

        view.set_mode(ImageViewMode::Ideal);
        assert_eq!(layouts.load(Ordering::SeqCst), 0);
        view.set_mode(ImageViewMode::Center);
        assert_eq!(layouts.load(Ordering::SeqCst), 1);
        assert_eq!(repaints.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_metafile_clears_background() {
        let toolkit = toolkit();
        let mut view = ImageView::new(&toolkit).unwrap();
        let metafile = Metafile::new(SizePixels::new(10, 10), 96, Vec::new()).unwrap();
        view.set_image(Some(metafile.into()));
        assert!(view.widget_base().clears_background());

        view.set_image(Some(bitmap(10, 10)));
        assert!(!view.widget_base().clears_background());
    }

    #[test]
    fn test_dpi_change_requests_layout() {
        let toolkit = toolkit();
        let mut view = ImageView::new(&toolkit).unwrap();
        let layouts = counter(&view.widget_base().layout_requested);
        view.apply_dpi(144);
        view.apply_dpi(144);
        assert_eq!(layouts.load(Ordering::SeqCst), 1);
        assert_eq!(view.widget_base().dpi(), 144);
    }
}
