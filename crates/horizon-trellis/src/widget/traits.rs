//! Core widget trait definitions.
//!
//! This module defines the [`Widget`] trait which is the foundation for all
//! elements a container can hold.
//!
//! # Related Types
//!
//! - [`super::WidgetBase`] - Common implementation for widgets
//! - [`super::layout::LayoutItem`] - What the layout engine sees of a widget

use horizon_trellis_core::Object;
use horizon_trellis_render::{Canvas, RenderResult};

use super::base::WidgetBase;
use super::layout::{LayoutContext, LayoutItem};

/// The base trait for all widgets.
///
/// A widget owns a [`WidgetBase`] and describes itself to layouts by
/// producing a fresh [`LayoutItem`] for each layout pass.
pub trait Widget: Object + Send + Sync {
    /// Get a reference to the widget's base.
    fn widget_base(&self) -> &WidgetBase;

    /// Get a mutable reference to the widget's base.
    fn widget_base_mut(&mut self) -> &mut WidgetBase;

    /// Build the layout item for one layout pass.
    ///
    /// The item must carry the widget's current layout geometry, see
    /// [`WidgetBase::layout_geometry`].
    fn create_layout_item(&self, ctx: &LayoutContext) -> Box<dyn LayoutItem>;

    /// Paint the widget's client area.
    ///
    /// Coordinates are relative to the client area. The default paints nothing.
    fn paint(&self, canvas: &mut dyn Canvas) -> RenderResult<()> {
        let _ = canvas;
        Ok(())
    }

    /// Apply a new DPI.
    ///
    /// The default requests a repaint and a re-layout when the DPI changed.
    fn apply_dpi(&mut self, dpi: i32) {
        let base = self.widget_base_mut();
        if base.set_dpi(dpi) {
            base.request_repaint();
            base.request_layout();
        }
    }

    /// Lay out the widget's own children after its bounds were assigned.
    ///
    /// Only containers have anything to do here.
    fn layout_children(&mut self) {}
}
