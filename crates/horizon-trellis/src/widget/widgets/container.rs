//! Container widget implementation.
//!
//! This module provides [`Container`], a widget that owns child widgets and
//! positions them with an optional [`GridLayout`].
//!
//! # Example
//!
//! ```
//! use horizon_trellis::config::ToolkitConfig;
//! use horizon_trellis::toolkit::Toolkit;
//! use horizon_trellis::widget::layout::GridRange;
//! use horizon_trellis::widget::widgets::{Container, Spacer};
//! use horizon_trellis::render::SizePixels;
//!
//! let toolkit = Toolkit::init(ToolkitConfig::default()).unwrap();
//! let mut container = Container::new(&toolkit).unwrap();
//! container.set_layout(toolkit.grid_layout());
//!
//! let left = container.add_child(Box::new(Spacer::h_spacer_fixed(&toolkit, 50).unwrap())).unwrap();
//! let right = container.add_child(Box::new(Spacer::h_spacer(&toolkit).unwrap())).unwrap();
//! container.set_range(left, GridRange::cell(0, 0)).unwrap();
//! container.set_range(right, GridRange::cell(0, 1)).unwrap();
//!
//! container.resize(SizePixels::new(300, 40));
//! let results = container.perform_layout();
//! assert_eq!(results.len(), 2);
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_trellis_core::logging::{span_names, targets};
use horizon_trellis_core::{ConnectionId, Object, ObjectId, PerfSpan};
use horizon_trellis_render::{RectanglePixels, SizePixels};

use crate::error::{LayoutError, WidgetError};
use crate::toolkit::Toolkit;
use crate::widget::layout::{
    ContainerLink, GridLayout, GridLayoutItem, GridRange, LayoutContext, LayoutItem, LayoutResultItem,
};
use crate::widget::{Widget, WidgetBase};

/// A widget that holds child widgets and lays them out on a grid.
///
/// Children are owned by the container and registered as its children in
/// the object registry, which is what the grid layout checks membership
/// against. A container is itself a widget, so containers nest; a nested
/// container reports its grid as its layout item.
///
/// Any `layout_requested` emission from the container or one of its
/// children marks the container as needing a layout pass, see
/// [`is_layout_pending`](Self::is_layout_pending).
pub struct Container {
    base: WidgetBase,
    layout: Option<GridLayout>,
    children: HashMap<ObjectId, Box<dyn Widget>>,
    /// Insertion order of `children`.
    order: Vec<ObjectId>,
    /// Forwarding connections on each child's `layout_requested`.
    forwarders: HashMap<ObjectId, ConnectionId>,
    layout_pending: Arc<AtomicBool>,
    /// Carries the toolkit's worker pool; the DPI is replaced per pass.
    context: LayoutContext,
}

impl Container {
    /// The registered class name.
    pub const CLASS_NAME: &'static str = "Container";

    /// Create an empty container without a layout.
    pub fn new(toolkit: &Toolkit) -> Result<Self, WidgetError> {
        let base = WidgetBase::new(toolkit, Self::CLASS_NAME)?;

        let layout_pending = Arc::new(AtomicBool::new(false));
        let pending = layout_pending.clone();
        base.layout_requested.connect(move |_| {
            pending.store(true, Ordering::SeqCst);
        });

        let context = toolkit.layout_context(base.dpi());

        Ok(Self {
            base,
            layout: None,
            children: HashMap::new(),
            order: Vec::new(),
            forwarders: HashMap::new(),
            layout_pending,
            context,
        })
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Get the container's layout.
    pub fn layout(&self) -> Option<&GridLayout> {
        self.layout.as_ref()
    }

    /// Get a mutable reference to the container's layout.
    pub fn layout_mut(&mut self) -> Option<&mut GridLayout> {
        self.layout.as_mut()
    }

    /// Set the container's layout, replacing any previous one.
    pub fn set_layout(&mut self, mut layout: GridLayout) {
        if let Some(mut old) = self.layout.take() {
            old.set_container(None);
        }

        layout.set_container(Some(ContainerLink {
            id: self.base.object_id(),
            registry: self.base.registry().clone(),
            layout_requested: self.base.layout_requested.clone(),
        }));
        self.layout = Some(layout);
        self.base.request_layout();
    }

    /// Remove and return the container's layout.
    pub fn take_layout(&mut self) -> Option<GridLayout> {
        let mut layout = self.layout.take()?;
        layout.set_container(None);
        self.base.request_layout();
        Some(layout)
    }

    /// Place a child on a cell range of the layout.
    pub fn set_range(&mut self, widget: ObjectId, range: GridRange) -> Result<(), LayoutError> {
        self.layout.as_mut().ok_or(LayoutError::NoLayout)?.set_range(widget, range)
    }

    /// Whether a layout pass was requested since the last one.
    pub fn is_layout_pending(&self) -> bool {
        self.layout_pending.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Take ownership of `widget` as a child.
    ///
    /// The child is not placed on the grid until [`set_range`](Self::set_range)
    /// is called for it.
    pub fn add_child(&mut self, widget: Box<dyn Widget>) -> Result<ObjectId, WidgetError> {
        let id = widget.object_id();
        widget.widget_base().set_parent(Some(self.base.object_id()))?;

        let parent_requests = self.base.layout_requested.clone();
        let connection = widget.widget_base().layout_requested.connect(move |_| {
            parent_requests.emit(());
        });

        self.forwarders.insert(id, connection);
        self.children.insert(id, widget);
        self.order.push(id);

        tracing::debug!(target: targets::WIDGET, container = ?self.base.object_id(), child = ?id, "child added");
        self.base.request_layout();
        Ok(id)
    }

    /// Remove a child, handing ownership back to the caller.
    ///
    /// The child is also removed from the layout.
    pub fn remove_child(&mut self, id: ObjectId) -> Result<Box<dyn Widget>, WidgetError> {
        let widget = self.children.remove(&id).ok_or(WidgetError::WidgetNotFound(id))?;
        self.order.retain(|&child| child != id);
        if let Some(connection) = self.forwarders.remove(&id) {
            widget.widget_base().layout_requested.disconnect(connection);
        }
        if let Some(layout) = &mut self.layout {
            layout.remove_widget(id);
        }
        widget.widget_base().set_parent(None)?;

        tracing::debug!(target: targets::WIDGET, container = ?self.base.object_id(), child = ?id, "child removed");
        self.base.request_layout();
        Ok(widget)
    }

    /// Get a child by ID.
    pub fn child(&self, id: ObjectId) -> Option<&dyn Widget> {
        self.children.get(&id).map(|w| w.as_ref())
    }

    /// Get a mutable reference to a child by ID.
    pub fn child_mut(&mut self, id: ObjectId) -> Option<&mut (dyn Widget + 'static)> {
        self.children.get_mut(&id).map(|w| w.as_mut())
    }

    /// Child IDs in the order they were added.
    pub fn children(&self) -> &[ObjectId] {
        &self.order
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.order.len()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Resize the container, keeping its position.
    pub fn resize(&mut self, size: SizePixels) {
        let bounds = RectanglePixels::from_parts(self.base.bounds().location(), size);
        if bounds != self.base.bounds() {
            self.base.set_bounds(bounds);
            self.layout_pending.store(true, Ordering::SeqCst);
        }
    }

    fn layout_context(&self) -> LayoutContext {
        self.context.clone().with_dpi(self.base.dpi())
    }

    /// Run a layout pass over the current client size.
    ///
    /// Snapshots the grid, computes placements and writes the bounds back to
    /// the children; nested containers lay out their own children in turn.
    /// Returns the placements in layout order.
    pub fn perform_layout(&mut self) -> Vec<LayoutResultItem> {
        self.layout_pending.store(false, Ordering::SeqCst);

        let Some(layout) = &self.layout else {
            return Vec::new();
        };

        let _span = PerfSpan::new(span_names::LAYOUT_PASS);
        let ctx = self.layout_context();
        let mut item = layout.create_layout_item(&self.children, &ctx);
        item.geometry_mut().client_size = self.base.client_size();

        let results = item.perform_layout();

        for result in &results {
            let Some(id) = result.widget else { continue };
            if let Some(child) = self.children.get_mut(&id) {
                child.widget_base_mut().set_bounds(result.bounds);
                child.layout_children();
            }
        }

        tracing::debug!(
            target: targets::LAYOUT,
            container = ?self.base.object_id(),
            client_size = ?self.base.client_size(),
            placed = results.len(),
            "layout pass finished"
        );

        results
    }

    /// The smallest size the container's layout can take.
    pub fn min_size(&self) -> SizePixels {
        self.create_layout_item(&self.layout_context()).min_size()
    }
}

impl Object for Container {
    fn object_id(&self) -> ObjectId {
        self.base.object_id()
    }
}

impl Widget for Container {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn create_layout_item(&self, ctx: &LayoutContext) -> Box<dyn LayoutItem> {
        let mut item = match &self.layout {
            Some(layout) => layout.create_layout_item(&self.children, ctx),
            None => GridLayoutItem::new(ctx),
        };
        *item.geometry_mut() = self.base.layout_geometry(ctx.dpi());
        Box::new(item)
    }

    fn apply_dpi(&mut self, dpi: i32) {
        if !self.base.set_dpi(dpi) {
            return;
        }
        for id in &self.order {
            if let Some(child) = self.children.get_mut(id) {
                child.apply_dpi(dpi);
            }
        }
        self.base.request_repaint();
        self.base.request_layout();
    }

    fn layout_children(&mut self) {
        self.perform_layout();
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("base", &self.base)
            .field("layout", &self.layout)
            .field("children", &self.order)
            .finish()
    }
}

static_assertions::assert_impl_all!(Container: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolkitConfig;
    use crate::widget::layout::CellAlignment;
    use crate::widget::widgets::{ImageView, Spacer};
    use horizon_trellis_render::Size;

    fn toolkit() -> Toolkit {
        let mut config = ToolkitConfig::default();
        config.layout.parallel_rows = false;
        Toolkit::init(config).unwrap()
    }

    fn gridded(toolkit: &Toolkit) -> Container {
        let mut container = Container::new(toolkit).unwrap();
        container.set_layout(GridLayout::new());
        container
    }

    #[test]
    fn test_add_child_registers_parent() {
        let toolkit = toolkit();
        let mut container = gridded(&toolkit);
        let id = container.add_child(Box::new(Spacer::h_spacer(&toolkit).unwrap())).unwrap();

        assert!(toolkit.registry().is_child_of(id, container.object_id()));
        assert_eq!(container.children(), &[id]);
        assert_eq!(container.child(id).unwrap().widget_base().parent_id(), Some(container.object_id()));
    }

    #[test]
    fn test_set_range_requires_layout_and_membership() {
        let toolkit = toolkit();
        let mut container = Container::new(&toolkit).unwrap();
        let id = container.add_child(Box::new(Spacer::h_spacer(&toolkit).unwrap())).unwrap();
        assert_eq!(container.set_range(id, GridRange::cell(0, 0)), Err(LayoutError::NoLayout));

        container.set_layout(GridLayout::new());
        let stranger = Spacer::h_spacer(&toolkit).unwrap();
        assert_eq!(
            container.set_range(stranger.object_id(), GridRange::cell(0, 0)),
            Err(LayoutError::NotAChild(stranger.object_id()))
        );
        assert!(container.set_range(id, GridRange::cell(0, 0)).is_ok());
    }

    #[test]
    fn test_perform_layout_writes_bounds() {
        let toolkit = toolkit();
        let mut container = gridded(&toolkit);
        let mut left = ImageView::new(&toolkit).unwrap();
        left.set_mode(crate::widget::widgets::ImageViewMode::Stretch);
        let mut right = ImageView::new(&toolkit).unwrap();
        right.set_mode(crate::widget::widgets::ImageViewMode::Stretch);

        let left = container.add_child(Box::new(left)).unwrap();
        let right = container.add_child(Box::new(right)).unwrap();
        container.set_range(left, GridRange::cell(0, 0)).unwrap();
        container.set_range(right, GridRange::cell(0, 1)).unwrap();

        container.resize(SizePixels::new(220, 100));
        assert!(container.is_layout_pending());
        let results = container.perform_layout();
        assert!(!container.is_layout_pending());

        assert_eq!(results.len(), 2);
        assert_eq!(container.child(left).unwrap().widget_base().bounds(), RectanglePixels::new(9, 9, 98, 82));
        assert_eq!(container.child(right).unwrap().widget_base().bounds(), RectanglePixels::new(113, 9, 98, 82));
    }

    #[test]
    fn test_remove_child_clears_grid_cells() {
        let toolkit = toolkit();
        let mut container = gridded(&toolkit);
        let id = container.add_child(Box::new(Spacer::h_spacer(&toolkit).unwrap())).unwrap();
        container.set_range(id, GridRange::new(0, 0, 2, 2)).unwrap();

        let widget = container.remove_child(id).unwrap();
        assert_eq!(widget.object_id(), id);
        assert_eq!(container.layout().unwrap().widget_at(1, 1), None);
        assert_eq!(container.layout().unwrap().range(id), None);
        assert!(!toolkit.registry().is_child_of(id, container.object_id()));
        assert!(matches!(container.remove_child(id), Err(WidgetError::WidgetNotFound(_))));
    }

    #[test]
    fn test_child_requests_propagate() {
        let toolkit = toolkit();
        let mut container = gridded(&toolkit);
        let id = container.add_child(Box::new(Spacer::h_spacer(&toolkit).unwrap())).unwrap();
        container.perform_layout();
        assert!(!container.is_layout_pending());

        container
            .child_mut(id)
            .unwrap()
            .widget_base_mut()
            .set_min_size(Size::new(30, 30));
        assert!(container.is_layout_pending());

        let mut removed = container.remove_child(id).unwrap();
        container.perform_layout();
        removed.widget_base_mut().set_min_size(Size::new(40, 40));
        assert!(!container.is_layout_pending());
    }

    #[test]
    fn test_layout_changes_mark_pending() {
        let toolkit = toolkit();
        let mut container = gridded(&toolkit);
        container.perform_layout();

        container.layout_mut().unwrap().set_spacing(2);
        assert!(container.is_layout_pending());
        container.perform_layout();

        container
            .layout_mut()
            .unwrap()
            .set_alignment(CellAlignment::center());
        assert!(container.is_layout_pending());
    }

    #[test]
    fn test_nested_container_lays_out_children() {
        let toolkit = toolkit();
        let mut outer = gridded(&toolkit);
        let mut inner = gridded(&toolkit);
        inner.layout_mut().unwrap().set_margins(crate::widget::layout::ContentMargins::uniform(0));

        let mut view = ImageView::new(&toolkit).unwrap();
        view.set_mode(crate::widget::widgets::ImageViewMode::Zoom);
        let view = inner.add_child(Box::new(view)).unwrap();
        inner.set_range(view, GridRange::cell(0, 0)).unwrap();

        let inner = outer.add_child(Box::new(inner)).unwrap();
        outer.set_range(inner, GridRange::cell(0, 0)).unwrap();
        outer.resize(SizePixels::new(118, 118));
        outer.perform_layout();

        assert_eq!(outer.child(inner).unwrap().widget_base().bounds(), RectanglePixels::new(9, 9, 100, 100));
    }

    #[test]
    fn test_apply_dpi_reaches_children() {
        let toolkit = toolkit();
        let mut container = gridded(&toolkit);
        let id = container.add_child(Box::new(Spacer::h_spacer_fixed(&toolkit, 10).unwrap())).unwrap();
        container.perform_layout();

        container.apply_dpi(192);
        assert_eq!(container.widget_base().dpi(), 192);
        assert_eq!(container.child(id).unwrap().widget_base().dpi(), 192);
        assert!(container.is_layout_pending());
    }

    #[test]
    fn test_min_size_of_grid() {
        let toolkit = toolkit();
        let mut container = gridded(&toolkit);
        let id = container.add_child(Box::new(Spacer::h_spacer_fixed(&toolkit, 40).unwrap())).unwrap();
        container.set_range(id, GridRange::cell(0, 0)).unwrap();
        assert_eq!(container.min_size(), SizePixels::new(58, 18));
    }
}
