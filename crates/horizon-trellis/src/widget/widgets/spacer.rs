//! Spacer widget implementation.
//!
//! This module provides [`Spacer`], a widget that occupies space in grid
//! layouts without any visible content.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::config::ToolkitConfig;
//! use horizon_trellis::toolkit::Toolkit;
//! use horizon_trellis::widget::layout::LayoutFlags;
//! use horizon_trellis::widget::widgets::Spacer;
//!
//! let toolkit = Toolkit::init(ToolkitConfig::default()).unwrap();
//!
//! // Pushes its neighbours apart horizontally.
//! let spring = Spacer::h_spacer(&toolkit).unwrap();
//! assert!(spring.config().layout_flags.contains(LayoutFlags::GREEDY_HORZ));
//!
//! // A fixed 20px gap.
//! let gap = Spacer::h_spacer_fixed(&toolkit, 20).unwrap();
//! assert!(gap.config().layout_flags.is_empty());
//! ```

use horizon_trellis_core::{Object, ObjectId};
use horizon_trellis_render::Size;

use crate::error::WidgetError;
use crate::toolkit::Toolkit;
use crate::widget::layout::{LayoutContext, LayoutFlags, LayoutItem, SpacerLayoutItem};
use crate::widget::{Widget, WidgetBase};

/// Full description of a spacer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpacerConfig {
    /// Layout flags reported to the layout.
    pub layout_flags: LayoutFlags,
    /// Ideal and minimum size in 96-dpi units.
    pub size_hint: Size,
    /// Keep greediness from propagating to enclosing layouts.
    pub greedy_locally_only: bool,
}

/// A widget that provides empty space in layouts.
///
/// Spacers never paint. Greedy spacers claim leftover space in their row or
/// column, but only after greedy content has been satisfied.
pub struct Spacer {
    base: WidgetBase,
    config: SpacerConfig,
}

impl Spacer {
    /// The registered class name.
    pub const CLASS_NAME: &'static str = "Spacer";

    /// Create a spacer from an explicit configuration.
    pub fn with_config(toolkit: &Toolkit, config: SpacerConfig) -> Result<Self, WidgetError> {
        Ok(Self {
            base: WidgetBase::new(toolkit, Self::CLASS_NAME)?,
            config,
        })
    }

    /// Create a horizontal spring that claims leftover width.
    pub fn h_spacer(toolkit: &Toolkit) -> Result<Self, WidgetError> {
        Self::with_config(
            toolkit,
            SpacerConfig {
                layout_flags: LayoutFlags::SHRINKABLE_HORZ
                    | LayoutFlags::SHRINKABLE_VERT
                    | LayoutFlags::GROWABLE_HORZ
                    | LayoutFlags::GREEDY_HORZ,
                ..SpacerConfig::default()
            },
        )
    }

    /// Create a vertical spring that claims leftover height.
    pub fn v_spacer(toolkit: &Toolkit) -> Result<Self, WidgetError> {
        Self::with_config(
            toolkit,
            SpacerConfig {
                layout_flags: LayoutFlags::SHRINKABLE_HORZ
                    | LayoutFlags::SHRINKABLE_VERT
                    | LayoutFlags::GROWABLE_VERT
                    | LayoutFlags::GREEDY_VERT,
                ..SpacerConfig::default()
            },
        )
    }

    /// Create a fixed horizontal gap of `width` (96-dpi units).
    pub fn h_spacer_fixed(toolkit: &Toolkit, width: i32) -> Result<Self, WidgetError> {
        Self::with_config(
            toolkit,
            SpacerConfig {
                size_hint: Size::new(width, 0),
                ..SpacerConfig::default()
            },
        )
    }

    /// Create a fixed vertical gap of `height` (96-dpi units).
    pub fn v_spacer_fixed(toolkit: &Toolkit, height: i32) -> Result<Self, WidgetError> {
        Self::with_config(
            toolkit,
            SpacerConfig {
                size_hint: Size::new(0, height),
                ..SpacerConfig::default()
            },
        )
    }

    /// The spacer's configuration.
    #[inline]
    pub fn config(&self) -> &SpacerConfig {
        &self.config
    }
}

impl Object for Spacer {
    fn object_id(&self) -> ObjectId {
        self.base.object_id()
    }
}

impl Widget for Spacer {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn create_layout_item(&self, ctx: &LayoutContext) -> Box<dyn LayoutItem> {
        let mut item = SpacerLayoutItem::new(
            ctx,
            self.config.layout_flags,
            self.config.size_hint,
            self.config.greedy_locally_only,
        );
        *item.geometry_mut() = self.base.layout_geometry(ctx.dpi());
        Box::new(item)
    }
}

static_assertions::assert_impl_all!(Spacer: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolkitConfig;
    use crate::widget::layout::ItemRole;
    use horizon_trellis_render::{RecordingCanvas, SizePixels};

    fn toolkit() -> Toolkit {
        let mut config = ToolkitConfig::default();
        config.layout.parallel_rows = false;
        Toolkit::init(config).unwrap()
    }

    #[test]
    fn test_h_spacer_flags() {
        let toolkit = toolkit();
        let spacer = Spacer::h_spacer(&toolkit).unwrap();
        let item = spacer.create_layout_item(&LayoutContext::new(96));
        assert_eq!(
            item.layout_flags(),
            LayoutFlags::SHRINKABLE_HORZ
                | LayoutFlags::SHRINKABLE_VERT
                | LayoutFlags::GROWABLE_HORZ
                | LayoutFlags::GREEDY_HORZ
        );
        assert_eq!(item.ideal_size(), SizePixels::ZERO);
        assert_eq!(item.role(), ItemRole::Spacer { greedy_locally_only: false });
    }

    #[test]
    fn test_v_spacer_flags() {
        let toolkit = toolkit();
        let spacer = Spacer::v_spacer(&toolkit).unwrap();
        let flags = spacer.config().layout_flags;
        assert!(flags.contains(LayoutFlags::GREEDY_VERT | LayoutFlags::GROWABLE_VERT));
        assert!(!flags.contains(LayoutFlags::GROWABLE_HORZ));
    }

    #[test]
    fn test_fixed_spacers() {
        let toolkit = toolkit();
        let h = Spacer::h_spacer_fixed(&toolkit, 20).unwrap();
        let v = Spacer::v_spacer_fixed(&toolkit, 30).unwrap();
        let ctx = LayoutContext::new(192);

        let item = h.create_layout_item(&ctx);
        assert!(item.layout_flags().is_empty());
        assert_eq!(item.ideal_size(), SizePixels::new(40, 0));
        assert_eq!(item.min_size(), SizePixels::new(40, 0));
        assert_eq!(v.create_layout_item(&ctx).ideal_size(), SizePixels::new(0, 60));
    }

    #[test]
    fn test_config_form() {
        let toolkit = toolkit();
        let config = SpacerConfig {
            layout_flags: LayoutFlags::GREEDY_HORZ,
            size_hint: Size::new(5, 5),
            greedy_locally_only: true,
        };
        let spacer = Spacer::with_config(&toolkit, config).unwrap();
        assert_eq!(*spacer.config(), config);
        let item = spacer.create_layout_item(&LayoutContext::new(96));
        assert_eq!(item.role(), ItemRole::Spacer { greedy_locally_only: true });
    }

    #[test]
    fn test_spacer_never_paints() {
        let toolkit = toolkit();
        let spacer = Spacer::h_spacer(&toolkit).unwrap();
        let mut canvas = RecordingCanvas::new(SizePixels::new(10, 10), 96);
        spacer.paint(&mut canvas).unwrap();
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn test_hidden_spacer_item_is_not_laid_out() {
        let toolkit = toolkit();
        let mut spacer = Spacer::h_spacer(&toolkit).unwrap();
        spacer.widget_base_mut().set_visible(false).unwrap();
        let item = spacer.create_layout_item(&LayoutContext::new(96));
        assert!(!crate::widget::layout::should_layout(item.as_ref()));
    }
}
