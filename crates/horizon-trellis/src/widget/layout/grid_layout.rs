//! Grid layout model.
//!
//! `GridLayout` is the mutable configuration a container owns: a table of
//! cells, each optionally bound to one child widget, plus per-row and
//! per-column stretch factors. The table only grows. Layout passes never
//! read it directly; they work on a [`GridLayoutItem`] snapshot created by
//! [`GridLayout::create_layout_item`].
//!
//! # Example
//!
//! ```ignore
//! use horizon_trellis::widget::layout::{GridLayout, GridRange};
//!
//! let mut grid = GridLayout::new();
//! container.set_layout(grid);
//!
//! container.set_range(label_id, GridRange::new(0, 0, 1, 1))?;
//! container.set_range(input_id, GridRange::new(0, 1, 1, 1))?;
//! container.set_range(button_id, GridRange::new(1, 0, 1, 2))?; // spans two columns
//!
//! container.layout_mut().unwrap().set_column_stretch_factor(1, 2)?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{ObjectId, SharedObjectRegistry, Signal};

use super::grid_layout_item::GridLayoutItem;
use super::item::CellAlignment;
use super::{ContentMargins, DEFAULT_MARGINS, DEFAULT_SPACING, LayoutContext};
use crate::error::LayoutError;
use crate::widget::dispatcher::WidgetAccess;

/// A rectangular block of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRange {
    /// Top row.
    pub row: usize,
    /// Left column.
    pub column: usize,
    /// Number of rows covered.
    pub row_span: usize,
    /// Number of columns covered.
    pub column_span: usize,
}

impl GridRange {
    /// Create a new range.
    pub const fn new(row: usize, column: usize, row_span: usize, column_span: usize) -> Self {
        Self {
            row,
            column,
            row_span,
            column_span,
        }
    }

    /// A single cell.
    pub const fn cell(row: usize, column: usize) -> Self {
        Self::new(row, column, 1, 1)
    }

    /// One past the last covered row.
    #[inline]
    pub fn row_end(&self) -> usize {
        self.row + self.row_span
    }

    /// One past the last covered column.
    #[inline]
    pub fn column_end(&self) -> usize {
        self.column + self.column_span
    }

    pub(crate) fn validate(&self) -> Result<(), LayoutError> {
        if self.row_span < 1 || self.column_span < 1 {
            return Err(LayoutError::ZeroSpan {
                row_span: self.row_span,
                column_span: self.column_span,
            });
        }
        Ok(())
    }
}

/// The container a layout is attached to.
#[derive(Clone)]
pub(crate) struct ContainerLink {
    pub(crate) id: ObjectId,
    pub(crate) registry: Arc<SharedObjectRegistry>,
    pub(crate) layout_requested: Arc<Signal<()>>,
}

impl ContainerLink {
    fn contains(&self, widget: ObjectId) -> bool {
        self.registry.is_child_of(widget, self.id)
    }
}

impl std::fmt::Debug for ContainerLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerLink").field("id", &self.id).finish()
    }
}

/// A grid layout that arranges a container's children in rows and columns.
///
/// Rows and columns are created on demand when a range or stretch factor
/// refers to them; new sections start with a stretch factor of 1. Every
/// setter validates its arguments before changing anything.
#[derive(Debug)]
pub struct GridLayout {
    container: Option<ContainerLink>,
    margins: ContentMargins,
    spacing: i32,
    alignment: CellAlignment,
    row_stretch_factors: Vec<u32>,
    column_stretch_factors: Vec<u32>,
    /// `cells[row][column]`, one row per row stretch factor.
    cells: Vec<Vec<Option<ObjectId>>>,
    ranges: HashMap<ObjectId, GridRange>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl GridLayout {
    /// Create a new empty grid layout.
    pub fn new() -> Self {
        Self {
            container: None,
            margins: DEFAULT_MARGINS,
            spacing: DEFAULT_SPACING,
            alignment: CellAlignment::NEAR,
            row_stretch_factors: Vec::new(),
            column_stretch_factors: Vec::new(),
            cells: Vec::new(),
            ranges: HashMap::new(),
        }
    }

    // =========================================================================
    // Container
    // =========================================================================

    pub(crate) fn set_container(&mut self, container: Option<ContainerLink>) {
        self.container = container;
    }

    /// The container this layout is attached to.
    pub fn container(&self) -> Option<ObjectId> {
        self.container.as_ref().map(|c| c.id)
    }

    fn request_layout(&self) {
        if let Some(container) = &self.container {
            container.layout_requested.emit(());
        }
    }

    // =========================================================================
    // Dimensions
    // =========================================================================

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_stretch_factors.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.column_stretch_factors.len()
    }

    /// The widget occupying a cell, if any.
    pub fn widget_at(&self, row: usize, column: usize) -> Option<ObjectId> {
        self.cells.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    fn ensure_sufficient_size(&mut self, rows: usize, columns: usize) {
        if self.row_stretch_factors.len() < rows {
            self.row_stretch_factors.resize(rows, 1);
        }
        if self.column_stretch_factors.len() < columns {
            self.column_stretch_factors.resize(columns, 1);
        }

        let columns = self.column_stretch_factors.len();
        self.cells.resize_with(self.row_stretch_factors.len(), Vec::new);
        for row in &mut self.cells {
            row.resize(columns, None);
        }
    }

    fn set_widget_on_cells(&mut self, widget: Option<ObjectId>, range: GridRange) {
        for row in &mut self.cells[range.row..range.row_end()] {
            for cell in &mut row[range.column..range.column_end()] {
                *cell = widget;
            }
        }
    }

    // =========================================================================
    // Stretch Factors
    // =========================================================================

    /// The stretch factor of a row; 1 for rows that do not exist yet.
    pub fn row_stretch_factor(&self, row: usize) -> u32 {
        self.row_stretch_factors.get(row).copied().unwrap_or(1)
    }

    /// The stretch factor of a column; 1 for columns that do not exist yet.
    pub fn column_stretch_factor(&self, column: usize) -> u32 {
        self.column_stretch_factors.get(column).copied().unwrap_or(1)
    }

    /// Set the stretch factor of a row, growing the grid if needed.
    ///
    /// Setting the current value is a no-op.
    pub fn set_row_stretch_factor(&mut self, row: usize, factor: u32) -> Result<(), LayoutError> {
        if factor == self.row_stretch_factor(row) {
            return Ok(());
        }
        self.check_stretch_factor(factor)?;

        self.ensure_sufficient_size(row + 1, self.column_count());
        self.row_stretch_factors[row] = factor;
        self.request_layout();
        Ok(())
    }

    /// Set the stretch factor of a column, growing the grid if needed.
    ///
    /// Setting the current value is a no-op.
    pub fn set_column_stretch_factor(&mut self, column: usize, factor: u32) -> Result<(), LayoutError> {
        if factor == self.column_stretch_factor(column) {
            return Ok(());
        }
        self.check_stretch_factor(factor)?;

        self.ensure_sufficient_size(self.row_count(), column + 1);
        self.column_stretch_factors[column] = factor;
        self.request_layout();
        Ok(())
    }

    fn check_stretch_factor(&self, factor: u32) -> Result<(), LayoutError> {
        if self.container.is_none() {
            tracing::debug!(target: targets::LAYOUT, "rejected stretch factor: no container");
            return Err(LayoutError::NoContainer);
        }
        if factor < 1 {
            tracing::debug!(target: targets::LAYOUT, factor, "rejected stretch factor");
            return Err(LayoutError::InvalidStretchFactor(factor));
        }
        Ok(())
    }

    // =========================================================================
    // Ranges
    // =========================================================================

    /// The cell range of `widget`.
    ///
    /// `None` if the widget was never placed or is no longer a child of the
    /// container.
    pub fn range(&self, widget: ObjectId) -> Option<GridRange> {
        let container = self.container.as_ref()?;
        let range = self.ranges.get(&widget)?;
        container.contains(widget).then_some(*range)
    }

    /// Place `widget` on a block of cells.
    ///
    /// The widget's previous cells, if any, are cleared first. Any other
    /// widget overlapping the new range is displaced from the grid entirely,
    /// so every remaining range stays fully owned. The grid grows to fit the
    /// new range.
    pub fn set_range(&mut self, widget: ObjectId, range: GridRange) -> Result<(), LayoutError> {
        let Some(container) = &self.container else {
            tracing::debug!(target: targets::LAYOUT, ?widget, "rejected range: no container");
            return Err(LayoutError::NoContainer);
        };
        if !container.contains(widget) {
            tracing::debug!(target: targets::LAYOUT, ?widget, "rejected range: not a child");
            return Err(LayoutError::NotAChild(widget));
        }
        if let Err(err) = range.validate() {
            tracing::debug!(target: targets::LAYOUT, ?widget, ?range, "rejected range");
            return Err(err);
        }

        if let Some(previous) = self.ranges.get(&widget).copied() {
            self.clear_widget_cells(widget, previous);
        }

        self.ensure_sufficient_size(range.row_end(), range.column_end());

        for displaced in self.widgets_in(range) {
            if let Some(displaced_range) = self.ranges.remove(&displaced) {
                self.clear_widget_cells(displaced, displaced_range);
            }
            tracing::debug!(target: targets::LAYOUT, ?widget, ?displaced, "displaced overlapped widget");
        }

        self.set_widget_on_cells(Some(widget), range);
        self.ranges.insert(widget, range);

        tracing::trace!(target: targets::LAYOUT, ?widget, ?range, "set range");
        self.request_layout();
        Ok(())
    }

    /// Forget `widget`, clearing its cells.
    ///
    /// Returns `false` if the widget had no range.
    pub fn remove_widget(&mut self, widget: ObjectId) -> bool {
        let Some(range) = self.ranges.remove(&widget) else {
            return false;
        };
        self.clear_widget_cells(widget, range);
        self.request_layout();
        true
    }

    /// Distinct widgets occupying cells of `range`, in row-major order.
    fn widgets_in(&self, range: GridRange) -> Vec<ObjectId> {
        let mut found = Vec::new();
        for row in &self.cells[range.row..range.row_end()] {
            for cell in &row[range.column..range.column_end()] {
                match *cell {
                    Some(id) if !found.contains(&id) => found.push(id),
                    _ => {}
                }
            }
        }
        found
    }

    fn clear_widget_cells(&mut self, widget: ObjectId, range: GridRange) {
        for row in &mut self.cells[range.row..range.row_end()] {
            for cell in &mut row[range.column..range.column_end()] {
                if *cell == Some(widget) {
                    *cell = None;
                }
            }
        }
    }

    // =========================================================================
    // Margins, Spacing, Alignment
    // =========================================================================

    /// Content margins in 96-dpi units.
    pub fn margins(&self) -> ContentMargins {
        self.margins
    }

    /// Set content margins in 96-dpi units.
    pub fn set_margins(&mut self, margins: ContentMargins) {
        if self.margins != margins {
            self.margins = margins;
            self.request_layout();
        }
    }

    /// Spacing between sections in 96-dpi units.
    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    /// Set spacing between sections in 96-dpi units.
    pub fn set_spacing(&mut self, spacing: i32) {
        if self.spacing != spacing {
            self.spacing = spacing;
            self.request_layout();
        }
    }

    /// Default alignment for items that do not set their own.
    pub fn alignment(&self) -> CellAlignment {
        self.alignment
    }

    /// Set the default alignment.
    pub fn set_alignment(&mut self, alignment: CellAlignment) {
        if self.alignment != alignment {
            self.alignment = alignment;
            self.request_layout();
        }
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Build the layout item for one layout pass.
    ///
    /// Each placed widget is asked for its layout item once, in row-major
    /// order of its top-left cell. Cells whose widget cannot be found in
    /// `widgets` are left empty.
    pub fn create_layout_item(&self, widgets: &dyn WidgetAccess, ctx: &LayoutContext) -> GridLayoutItem {
        let mut item = GridLayoutItem::new(ctx);
        item.set_margins(self.margins);
        item.set_spacing(self.spacing);
        item.set_alignment(self.alignment);
        item.ensure_sufficient_size(self.row_count(), self.column_count());

        for (row, factor) in self.row_stretch_factors.iter().enumerate() {
            item.set_row_stretch_factor(row, *factor);
        }
        for (column, factor) in self.column_stretch_factors.iter().enumerate() {
            item.set_column_stretch_factor(column, *factor);
        }

        for (row, cells) in self.cells.iter().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                let Some(widget_id) = *cell else { continue };
                let Some(range) = self.ranges.get(&widget_id) else { continue };
                if range.row != row || range.column != column {
                    continue;
                }
                match widgets.get_widget(widget_id) {
                    Some(widget) => {
                        item.add_item(Some(widget_id), widget.create_layout_item(ctx), *range);
                    }
                    None => {
                        tracing::warn!(target: targets::LAYOUT, ?widget_id, "placed widget not found");
                    }
                }
            }
        }

        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixture {
        registry: Arc<SharedObjectRegistry>,
        container: ObjectId,
        requests: Arc<AtomicUsize>,
        grid: GridLayout,
    }

    impl Fixture {
        fn new() -> Self {
            let registry = Arc::new(SharedObjectRegistry::new());
            let container = registry.register("Container");
            let signal = Arc::new(Signal::<()>::new());
            let requests = Arc::new(AtomicUsize::new(0));
            let counter = requests.clone();
            signal.connect(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

            let mut grid = GridLayout::new();
            grid.set_container(Some(ContainerLink {
                id: container,
                registry: registry.clone(),
                layout_requested: signal,
            }));

            Self {
                registry,
                container,
                requests,
                grid,
            }
        }

        fn child(&self) -> ObjectId {
            let id = self.registry.register("Spacer");
            self.registry.set_parent(id, Some(self.container)).unwrap();
            id
        }

        fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = GridLayout::new();
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.column_count(), 0);
        assert_eq!(grid.margins(), ContentMargins::uniform(9));
        assert_eq!(grid.spacing(), 6);
        assert_eq!(grid.alignment(), CellAlignment::NEAR);
    }

    #[test]
    fn test_set_range_grows_and_marks_cells() {
        let mut f = Fixture::new();
        let a = f.child();
        f.grid.set_range(a, GridRange::new(1, 2, 2, 3)).unwrap();

        assert_eq!(f.grid.row_count(), 3);
        assert_eq!(f.grid.column_count(), 5);
        for row in 1..3 {
            for column in 2..5 {
                assert_eq!(f.grid.widget_at(row, column), Some(a));
            }
        }
        assert_eq!(f.grid.widget_at(0, 2), None);
        assert_eq!(f.grid.widget_at(1, 1), None);
        assert_eq!(f.grid.range(a), Some(GridRange::new(1, 2, 2, 3)));
        assert_eq!(f.requests(), 1);
    }

    #[test]
    fn test_reassigning_range_clears_old_cells() {
        let mut f = Fixture::new();
        let a = f.child();
        f.grid.set_range(a, GridRange::new(0, 0, 2, 2)).unwrap();
        f.grid.set_range(a, GridRange::cell(3, 3)).unwrap();

        assert_eq!(f.grid.widget_at(0, 0), None);
        assert_eq!(f.grid.widget_at(1, 1), None);
        assert_eq!(f.grid.widget_at(3, 3), Some(a));
        assert_eq!(f.grid.range(a), Some(GridRange::cell(3, 3)));
    }

    #[test]
    fn test_overlapping_range_displaces_previous_owner() {
        let mut f = Fixture::new();
        let a = f.child();
        let b = f.child();
        let c = f.child();
        f.grid.set_range(a, GridRange::new(0, 0, 1, 2)).unwrap();
        f.grid.set_range(c, GridRange::cell(1, 1)).unwrap();

        f.grid.set_range(b, GridRange::cell(0, 0)).unwrap();

        assert_eq!(f.grid.widget_at(0, 0), Some(b));
        assert_eq!(f.grid.widget_at(0, 1), None);
        assert_eq!(f.grid.range(a), None);
        assert_eq!(f.grid.range(c), Some(GridRange::cell(1, 1)));

        // A displaced widget can be placed again.
        f.grid.set_range(a, GridRange::new(0, 1, 2, 1)).unwrap();
        assert_eq!(f.grid.range(a), Some(GridRange::new(0, 1, 2, 1)));
        assert_eq!(f.grid.widget_at(1, 1), Some(a));
        assert_eq!(f.grid.range(c), None);
        assert_eq!(f.grid.range(b), Some(GridRange::cell(0, 0)));
    }

    #[test]
    fn test_growth_preserves_cells_and_factors() {
        let mut f = Fixture::new();
        let a = f.child();
        let b = f.child();
        f.grid.set_range(a, GridRange::cell(0, 0)).unwrap();
        f.grid.set_row_stretch_factor(0, 3).unwrap();
        f.grid.set_column_stretch_factor(0, 2).unwrap();

        f.grid.set_range(b, GridRange::cell(10, 7)).unwrap();

        assert_eq!(f.grid.widget_at(0, 0), Some(a));
        assert_eq!(f.grid.range(a), Some(GridRange::cell(0, 0)));
        assert_eq!(f.grid.row_stretch_factor(0), 3);
        assert_eq!(f.grid.column_stretch_factor(0), 2);
        assert_eq!(f.grid.row_stretch_factor(5), 1);
        assert_eq!(f.grid.row_count(), 11);
        assert_eq!(f.grid.column_count(), 8);
    }

    #[test]
    fn test_stretch_factor_defaults_beyond_bounds() {
        let grid = GridLayout::new();
        assert_eq!(grid.row_stretch_factor(42), 1);
        assert_eq!(grid.column_stretch_factor(7), 1);
    }

    #[test]
    fn test_stretch_factor_validation() {
        let mut f = Fixture::new();
        assert_eq!(
            f.grid.set_column_stretch_factor(2, 0),
            Err(LayoutError::InvalidStretchFactor(0))
        );
        assert_eq!(f.grid.column_count(), 0);
        assert_eq!(f.requests(), 0);

        // Unchanged value is accepted without growing or requesting layout.
        f.grid.set_row_stretch_factor(4, 1).unwrap();
        assert_eq!(f.grid.row_count(), 0);
        assert_eq!(f.requests(), 0);

        f.grid.set_row_stretch_factor(4, 2).unwrap();
        assert_eq!(f.grid.row_count(), 5);
        assert_eq!(f.requests(), 1);
    }

    #[test]
    fn test_stretch_factor_requires_container() {
        let mut grid = GridLayout::new();
        assert_eq!(grid.set_row_stretch_factor(0, 2), Err(LayoutError::NoContainer));
        assert_eq!(grid.row_count(), 0);
    }

    #[test]
    fn test_set_range_validation_does_not_mutate() {
        let mut f = Fixture::new();
        let a = f.child();
        f.grid.set_range(a, GridRange::cell(0, 0)).unwrap();
        let requests = f.requests();

        assert_eq!(
            f.grid.set_range(a, GridRange::new(5, 5, 0, 1)),
            Err(LayoutError::ZeroSpan {
                row_span: 0,
                column_span: 1
            })
        );

        let stranger = f.registry.register("Spacer");
        assert_eq!(
            f.grid.set_range(stranger, GridRange::cell(2, 2)),
            Err(LayoutError::NotAChild(stranger))
        );

        assert_eq!(f.grid.row_count(), 1);
        assert_eq!(f.grid.column_count(), 1);
        assert_eq!(f.grid.range(a), Some(GridRange::cell(0, 0)));
        assert_eq!(f.requests(), requests);
    }

    #[test]
    fn test_set_range_requires_container() {
        let registry = SharedObjectRegistry::new();
        let id = registry.register("Spacer");
        let mut grid = GridLayout::new();
        assert_eq!(grid.set_range(id, GridRange::cell(0, 0)), Err(LayoutError::NoContainer));
        assert_eq!(grid.range(id), None);
    }

    #[test]
    fn test_range_not_found_after_reparent() {
        let mut f = Fixture::new();
        let a = f.child();
        f.grid.set_range(a, GridRange::cell(0, 0)).unwrap();
        f.registry.set_parent(a, None).unwrap();
        assert_eq!(f.grid.range(a), None);

        let never_placed = f.child();
        assert_eq!(f.grid.range(never_placed), None);
    }

    #[test]
    fn test_remove_widget() {
        let mut f = Fixture::new();
        let a = f.child();
        f.grid.set_range(a, GridRange::new(0, 0, 1, 2)).unwrap();

        assert!(f.grid.remove_widget(a));
        assert_eq!(f.grid.widget_at(0, 0), None);
        assert_eq!(f.grid.widget_at(0, 1), None);
        assert_eq!(f.grid.range(a), None);
        assert!(!f.grid.remove_widget(a));
        // Sections stay.
        assert_eq!(f.grid.column_count(), 2);
    }

    #[test]
    fn test_setters_request_layout_only_on_change() {
        let mut f = Fixture::new();
        f.grid.set_spacing(6);
        f.grid.set_margins(ContentMargins::uniform(9));
        f.grid.set_alignment(CellAlignment::NEAR);
        assert_eq!(f.requests(), 0);

        f.grid.set_spacing(0);
        f.grid.set_margins(ContentMargins::uniform(0));
        f.grid.set_alignment(CellAlignment::center());
        assert_eq!(f.requests(), 3);
    }
}
