//! Widget base implementation.
//!
//! This module provides `WidgetBase`, the common implementation details
//! for all widgets. It handles bounds, size constraints, visibility and
//! DPI, and coordinates with the object registry.

use std::sync::Arc;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{ObjectId, ObjectResult, SharedObjectRegistry, Signal};
use horizon_trellis_render::{RectanglePixels, Size, SizePixels};

use super::layout::{CellAlignment, Geometry};
use crate::error::WidgetError;
use crate::toolkit::Toolkit;

/// The base implementation for all widgets.
///
/// Widget implementations include this as a field and delegate common
/// operations to it. The base registers an object in the toolkit's registry
/// on creation and destroys it again on drop.
pub struct WidgetBase {
    object_id: ObjectId,
    registry: Arc<SharedObjectRegistry>,

    /// Bounds relative to the parent's client area, in pixels.
    bounds: RectanglePixels,

    /// Declared minimum size in 96-dpi units; zero means none.
    min_size: Size,

    /// Declared maximum size in 96-dpi units; zero on an axis means unbounded.
    max_size: Size,

    alignment: Option<CellAlignment>,
    dpi: i32,
    clears_background: bool,

    /// Signal emitted when the widget needs its container to lay out again.
    ///
    /// Shared so a container's layout can fire it without borrowing the widget.
    pub layout_requested: Arc<Signal<()>>,

    /// Signal emitted when the widget needs to be painted again.
    pub repaint_requested: Signal<()>,

    /// Signal emitted when the bounds change.
    pub bounds_changed: Signal<RectanglePixels>,
}

impl WidgetBase {
    /// Create a new widget base for an instance of `class_name`.
    ///
    /// Fails if the class has not been registered with the toolkit.
    pub fn new(toolkit: &Toolkit, class_name: &'static str) -> Result<Self, WidgetError> {
        if !toolkit.is_class_registered(class_name) {
            tracing::debug!(target: targets::WIDGET, class_name, "refusing to create unregistered class");
            return Err(WidgetError::ClassNotRegistered(class_name));
        }

        let registry = toolkit.registry().clone();
        let object_id = registry.register(class_name);

        Ok(Self {
            object_id,
            registry,
            bounds: RectanglePixels::default(),
            min_size: Size::ZERO,
            max_size: Size::ZERO,
            alignment: None,
            dpi: toolkit.default_dpi(),
            clears_background: false,
            layout_requested: Arc::new(Signal::new()),
            repaint_requested: Signal::new(),
            bounds_changed: Signal::new(),
        })
    }

    // =========================================================================
    // Object System Delegation
    // =========================================================================

    /// Get the widget's unique object ID.
    #[inline]
    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    /// Get the widget's name.
    pub fn name(&self) -> String {
        self.registry.object_name(self.object_id).unwrap_or_default()
    }

    /// Set the widget's name.
    pub fn set_name(&self, name: impl Into<String>) -> ObjectResult<()> {
        self.registry.set_object_name(self.object_id, name.into())
    }

    /// Get the parent widget's object ID.
    pub fn parent_id(&self) -> Option<ObjectId> {
        self.registry.parent(self.object_id).ok().flatten()
    }

    pub(crate) fn set_parent(&self, parent: Option<ObjectId>) -> ObjectResult<()> {
        self.registry.set_parent(self.object_id, parent)
    }

    /// The registry the widget lives in.
    pub fn registry(&self) -> &Arc<SharedObjectRegistry> {
        &self.registry
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Check if the widget is visible.
    ///
    /// Hidden widgets take no part in layout.
    pub fn is_visible(&self) -> bool {
        self.registry.is_visible(self.object_id).unwrap_or(false)
    }

    /// Set whether the widget is visible.
    pub fn set_visible(&mut self, visible: bool) -> ObjectResult<()> {
        if self.registry.is_visible(self.object_id)? == visible {
            return Ok(());
        }
        self.registry.set_visible(self.object_id, visible)?;
        self.request_layout();
        Ok(())
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Bounds relative to the parent's client area, in pixels.
    #[inline]
    pub fn bounds(&self) -> RectanglePixels {
        self.bounds
    }

    /// Set the bounds.
    ///
    /// Emits `bounds_changed` if the bounds actually changed.
    pub fn set_bounds(&mut self, bounds: RectanglePixels) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.bounds_changed.emit(bounds);
            self.request_repaint();
        }
    }

    /// Size of the client area in pixels.
    #[inline]
    pub fn client_size(&self) -> SizePixels {
        self.bounds.size()
    }

    /// Declared minimum size in 96-dpi units.
    #[inline]
    pub fn min_size(&self) -> Size {
        self.min_size
    }

    /// Set the declared minimum size in 96-dpi units.
    pub fn set_min_size(&mut self, size: Size) {
        if self.min_size != size {
            self.min_size = size;
            self.request_layout();
        }
    }

    /// Declared maximum size in 96-dpi units.
    #[inline]
    pub fn max_size(&self) -> Size {
        self.max_size
    }

    /// Set the declared maximum size in 96-dpi units; zero means unbounded.
    pub fn set_max_size(&mut self, size: Size) {
        if self.max_size != size {
            self.max_size = size;
            self.request_layout();
        }
    }

    /// Alignment within the layout cell, if overriding the layout's default.
    #[inline]
    pub fn alignment(&self) -> Option<CellAlignment> {
        self.alignment
    }

    /// Set the alignment within the layout cell.
    pub fn set_alignment(&mut self, alignment: Option<CellAlignment>) {
        if self.alignment != alignment {
            self.alignment = alignment;
            self.request_layout();
        }
    }

    /// The geometry record handed to this widget's layout item.
    pub fn layout_geometry(&self, dpi: i32) -> Geometry {
        Geometry {
            alignment: self.alignment,
            min_size: self.min_size.to_pixels(dpi),
            max_size: self.max_size.to_pixels(dpi),
            client_size: self.client_size(),
            bounds: self.bounds,
            visible: self.is_visible(),
        }
    }

    // =========================================================================
    // DPI and Painting
    // =========================================================================

    /// The DPI the widget renders at.
    #[inline]
    pub fn dpi(&self) -> i32 {
        self.dpi
    }

    /// Set the DPI. Returns whether it changed.
    pub fn set_dpi(&mut self, dpi: i32) -> bool {
        if self.dpi == dpi {
            return false;
        }
        tracing::trace!(target: targets::WIDGET, id = ?self.object_id, from = self.dpi, to = dpi, "dpi changed");
        self.dpi = dpi;
        true
    }

    /// Whether the background is cleared before painting.
    #[inline]
    pub fn clears_background(&self) -> bool {
        self.clears_background
    }

    /// Set whether the background is cleared before painting.
    pub fn set_clears_background(&mut self, clears: bool) {
        self.clears_background = clears;
    }

    /// Ask the owning container to lay out again.
    pub fn request_layout(&self) {
        self.layout_requested.emit(());
    }

    /// Ask for the widget to be painted again.
    pub fn request_repaint(&self) {
        self.repaint_requested.emit(());
    }
}

impl Drop for WidgetBase {
    fn drop(&mut self) {
        // A parent dropped first has already destroyed this entry.
        let _ = self.registry.destroy(self.object_id);
    }
}

impl std::fmt::Debug for WidgetBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetBase")
            .field("object_id", &self.object_id)
            .field("bounds", &self.bounds)
            .field("min_size", &self.min_size)
            .field("max_size", &self.max_size)
            .field("dpi", &self.dpi)
            .finish()
    }
}

static_assertions::assert_impl_all!(WidgetBase: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolkitConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn toolkit() -> Toolkit {
        let mut config = ToolkitConfig::default();
        config.layout.parallel_rows = false;
        Toolkit::init(config).unwrap()
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
    fn test_unregistered_class_is_rejected() {
        let toolkit = toolkit();
        assert!(matches!(
            WidgetBase::new(&toolkit, "Label"),
            Err(WidgetError::ClassNotRegistered("Label"))
        ));
    }

    #[test]
    fn test_registers_and_destroys_object() {
        let toolkit = toolkit();
        let before = toolkit.registry().object_count();
        let base = WidgetBase::new(&toolkit, "Spacer").unwrap();
        assert_eq!(toolkit.registry().object_count(), before + 1);
        assert!(base.is_visible());
        assert_eq!(base.dpi(), 96);
        drop(base);
        assert_eq!(toolkit.registry().object_count(), before);
    }

    #[test]
    fn test_constraint_setters_request_layout_on_change() {
        let toolkit = toolkit();
        let mut base = WidgetBase::new(&toolkit, "Spacer").unwrap();
        let requests = counter(&base.layout_requested);

        base.set_min_size(Size::new(10, 10));
        base.set_min_size(Size::new(10, 10));
        base.set_max_size(Size::new(50, 0));
        base.set_alignment(Some(CellAlignment::center()));
        base.set_visible(false).unwrap();
        base.set_visible(false).unwrap();

        assert_eq!(requests.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_layout_geometry_in_pixels() {
        let toolkit = toolkit();
        let mut base = WidgetBase::new(&toolkit, "Spacer").unwrap();
        base.set_min_size(Size::new(10, 20));
        base.set_max_size(Size::new(100, 0));
        base.set_bounds(RectanglePixels::new(1, 2, 30, 40));

        let geometry = base.layout_geometry(192);
        assert_eq!(geometry.min_size, SizePixels::new(20, 40));
        assert_eq!(geometry.max_size, SizePixels::new(200, 0));
        assert_eq!(geometry.client_size, SizePixels::new(30, 40));
        assert!(geometry.visible);
    }

    #[test]
    fn test_set_bounds_emits_once() {
        let toolkit = toolkit();
        let mut base = WidgetBase::new(&toolkit, "Spacer").unwrap();
        let repaints = counter(&base.repaint_requested);

        base.set_bounds(RectanglePixels::new(0, 0, 10, 10));
        base.set_bounds(RectanglePixels::new(0, 0, 10, 10));
        assert_eq!(repaints.load(Ordering::SeqCst), 1);
        assert!(base.set_dpi(144));
        assert!(!base.set_dpi(144));
    }
}
