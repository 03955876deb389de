//! The grid layout engine.
//!
//! A [`GridLayoutItem`] is a snapshot of a [`GridLayout`](super::GridLayout)
//! taken at the start of a layout pass: the cells point at layout items
//! instead of live widgets, stretch factors are copied, and margins and
//! spacing are already in pixels. The snapshot computes column widths, row
//! heights, its own minimum size and the final bounds of every visible item.
//!
//! Minimum sizes are memoized per candidate size for the lifetime of the
//! snapshot; a new pass takes a new snapshot and starts with an empty cache.

use std::collections::HashMap;
use std::sync::Arc;

use horizon_trellis_core::logging::{span_names, targets};
use horizon_trellis_core::{ObjectId, PerfSpan, ThreadPool};
use horizon_trellis_render::{Pixel, RectanglePixels, SizePixels};
use parking_lot::Mutex;
use rayon::prelude::*;

use super::grid_layout::GridRange;
use super::item::{
    AxisAlignment, CellAlignment, Geometry, ItemRole, LayoutFlags, LayoutItem, LayoutResultItem,
    min_size_effective, should_layout,
};
use super::section::{self, SectionInfo, UNBOUNDED};
use super::{ContentMargins, DEFAULT_MARGINS, DEFAULT_SPACING, LayoutContext, Orientation};

#[derive(Debug)]
struct GridChild {
    widget: Option<ObjectId>,
    item: Box<dyn LayoutItem>,
    range: GridRange,
}

/// A grid of layout items, ready to be measured and laid out.
#[derive(Debug)]
pub struct GridLayoutItem {
    geometry: Geometry,
    dpi: i32,
    /// Pixels.
    margins: ContentMargins,
    /// Pixels.
    spacing: Pixel,
    alignment: CellAlignment,
    row_stretch_factors: Vec<u32>,
    column_stretch_factors: Vec<u32>,
    children: Vec<GridChild>,
    /// `cells[row][column]` holds an index into `children`.
    cells: Vec<Vec<Option<usize>>>,
    size_to_min_size: Mutex<HashMap<SizePixels, SizePixels>>,
    pool: Option<Arc<ThreadPool>>,
    parallel_row_threshold: usize,
}

impl GridLayoutItem {
    /// Create an empty grid with default margins and spacing at `ctx`'s DPI.
    pub fn new(ctx: &LayoutContext) -> Self {
        Self {
            geometry: Geometry::default(),
            dpi: ctx.dpi(),
            margins: DEFAULT_MARGINS.to_pixels(ctx.dpi()),
            spacing: ctx.to_pixels(DEFAULT_SPACING),
            alignment: CellAlignment::NEAR,
            row_stretch_factors: Vec::new(),
            column_stretch_factors: Vec::new(),
            children: Vec::new(),
            cells: Vec::new(),
            size_to_min_size: Mutex::new(HashMap::new()),
            pool: ctx.pool().cloned(),
            parallel_row_threshold: ctx.parallel_row_threshold(),
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Set content margins, given in 96-dpi units.
    pub fn set_margins(&mut self, margins: ContentMargins) {
        self.margins = margins.to_pixels(self.dpi);
        self.invalidate();
    }

    /// Set section spacing, given in 96-dpi units.
    pub fn set_spacing(&mut self, spacing: i32) {
        self.spacing = horizon_trellis_render::int_from_96dpi(spacing, self.dpi);
        self.invalidate();
    }

    /// Set the alignment used by items without their own.
    pub fn set_alignment(&mut self, alignment: CellAlignment) {
        self.alignment = alignment;
    }

    /// Set a row's stretch factor; values below 1 count as 1.
    pub fn set_row_stretch_factor(&mut self, row: usize, factor: u32) {
        self.ensure_sufficient_size(row + 1, self.column_stretch_factors.len());
        self.row_stretch_factors[row] = factor.max(1);
        self.invalidate();
    }

    /// Set a column's stretch factor; values below 1 count as 1.
    pub fn set_column_stretch_factor(&mut self, column: usize, factor: u32) {
        self.ensure_sufficient_size(self.row_stretch_factors.len(), column + 1);
        self.column_stretch_factors[column] = factor.max(1);
        self.invalidate();
    }

    /// Place `item` on `range`, growing the grid as needed.
    ///
    /// Spans of zero count as one. Cells already holding another item are
    /// taken over. Returns the item's child index.
    pub fn add_item(&mut self, widget: Option<ObjectId>, item: Box<dyn LayoutItem>, range: GridRange) -> usize {
        let range = GridRange::new(range.row, range.column, range.row_span.max(1), range.column_span.max(1));
        self.ensure_sufficient_size(range.row_end(), range.column_end());

        let index = self.children.len();
        self.children.push(GridChild { widget, item, range });
        for row in &mut self.cells[range.row..range.row_end()] {
            for cell in &mut row[range.column..range.column_end()] {
                *cell = Some(index);
            }
        }

        self.invalidate();
        index
    }

    pub(crate) fn ensure_sufficient_size(&mut self, rows: usize, columns: usize) {
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

    fn invalidate(&mut self) {
        self.size_to_min_size.get_mut().clear();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_stretch_factors.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.column_stretch_factors.len()
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.children.len()
    }

    /// The item at a child index.
    pub fn item(&self, index: usize) -> Option<&dyn LayoutItem> {
        self.children.get(index).map(|c| c.item.as_ref())
    }

    /// Mutable access to the item at a child index.
    pub fn item_mut(&mut self, index: usize) -> Option<&mut (dyn LayoutItem + 'static)> {
        self.invalidate();
        self.children.get_mut(index).map(|c| c.item.as_mut())
    }

    /// The cell range of the item at a child index.
    pub fn item_range(&self, index: usize) -> Option<GridRange> {
        self.children.get(index).map(|c| c.range)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// The smallest size the grid can take when offered `size`.
    ///
    /// Column widths are resolved against `size.width` first so that
    /// height-for-width items can report their height at a concrete width.
    /// Results are cached per `size` for the lifetime of this snapshot.
    pub fn min_size_for_size(&self, size: SizePixels) -> SizePixels {
        if self.cells.is_empty() {
            return SizePixels::ZERO;
        }

        if let Some(min) = self.size_to_min_size.lock().get(&size).copied() {
            tracing::trace!(target: targets::LAYOUT, ?size, ?min, "min size cache hit");
            return min;
        }

        let _span = PerfSpan::new(span_names::MIN_SIZE);

        let mut min_widths = vec![0; self.column_count()];
        for row in &self.cells {
            for (column, cell) in row.iter().enumerate() {
                let Some(child) = cell.map(|index| &self.children[index]) else {
                    continue;
                };
                if !should_layout(child.item.as_ref()) || child.range.column_span != 1 {
                    continue;
                }
                let min = min_size_effective(child.item.as_ref());
                min_widths[column] = min_widths[column].max(min.width);
            }
        }

        let widths = self.section_sizes(Orientation::Horizontal, size.width, &[]);
        let heights = self.row_min_heights(&widths);

        let width = self.margins.horizontal() + self.sum_with_spacing(&min_widths);
        let height = self.margins.vertical() + self.sum_with_spacing(&heights);
        let min = SizePixels::new(width, height);

        if width > 0 && height > 0 {
            self.size_to_min_size.lock().insert(size, min);
        }

        tracing::trace!(target: targets::LAYOUT, ?size, ?min, ?min_widths, ?heights, "computed min size");
        min
    }

    /// The tallest single-row item of every row at the given column widths.
    fn row_min_heights(&self, widths: &[Pixel]) -> Vec<Pixel> {
        let row_height = |row: usize| -> Pixel {
            let mut height = 0;
            for cell in &self.cells[row] {
                let Some(child) = cell.map(|index| &self.children[index]) else {
                    continue;
                };
                let item = child.item.as_ref();
                if !should_layout(item) || child.range.row_span != 1 {
                    continue;
                }
                let h = if item.has_height_for_width() {
                    item.height_for_width(self.spanned(child.range.column, child.range.column_span, widths))
                } else {
                    min_size_effective(item).height
                };
                height = height.max(h);
            }
            height
        };

        let rows = self.row_count();
        match &self.pool {
            Some(pool) if rows >= self.parallel_row_threshold => {
                tracing::trace!(target: targets::LAYOUT, rows, threads = pool.num_threads(), "parallel row pass");
                pool.execute(|| (0..rows).into_par_iter().map(&row_height).collect())
            }
            _ => (0..rows).map(&row_height).collect(),
        }
    }

    fn sum_with_spacing(&self, sizes: &[Pixel]) -> Pixel {
        let mut total = 0;
        let mut occupied = 0;
        for &size in sizes.iter().filter(|&&s| s > 0) {
            total += size;
            occupied += 1;
        }
        if occupied > 1 {
            total += self.spacing * (occupied - 1);
        }
        total
    }

    /// Total size of `span` sections from `start`, with spacing between the
    /// non-empty ones.
    fn spanned(&self, start: usize, span: usize, sizes: &[Pixel]) -> Pixel {
        let mut total = 0;
        for (i, &size) in sizes.iter().enumerate().skip(start).take(span) {
            if size > 0 {
                total += size;
                if i > start {
                    total += self.spacing;
                }
            }
        }
        total
    }

    /// Offset of section `index` from the near margin.
    fn offset(&self, index: usize, sizes: &[Pixel]) -> Pixel {
        sizes[..index]
            .iter()
            .filter(|&&size| size > 0)
            .map(|&size| size + self.spacing)
            .sum()
    }

    /// Resolve the sizes of every section along `orientation` in `space`.
    ///
    /// Row sizing needs the resolved column `widths` for height-for-width
    /// items; column sizing ignores it.
    fn section_sizes(&self, orientation: Orientation, space: Pixel, widths: &[Pixel]) -> Vec<Pixel> {
        let (stretch_factors, other_count) = match orientation {
            Orientation::Horizontal => (&self.column_stretch_factors, self.row_count()),
            Orientation::Vertical => (&self.row_stretch_factors, self.column_count()),
        };

        let mut sections: Vec<SectionInfo> = stretch_factors
            .iter()
            .enumerate()
            .map(|(index, &factor)| SectionInfo::new(index, factor))
            .collect();

        for (i, section) in sections.iter_mut().enumerate() {
            for j in 0..other_count {
                let cell = match orientation {
                    Orientation::Horizontal => self.cells[j][i],
                    Orientation::Vertical => self.cells[i][j],
                };
                let Some(child) = cell.map(|index| &self.children[index]) else {
                    continue;
                };
                let item = child.item.as_ref();
                if !should_layout(item) {
                    continue;
                }

                let flags = item.layout_flags();
                let max = item.geometry().max_size;
                let hfw = item.has_height_for_width();
                let preferred = if hfw { SizePixels::ZERO } else { item.ideal_size() };

                let single_span = match orientation {
                    Orientation::Horizontal => child.range.column_span == 1,
                    Orientation::Vertical => child.range.row_span == 1,
                };

                match orientation {
                    Orientation::Horizontal => {
                        if single_span {
                            section.min_size = section.min_size.max(min_size_effective(item).width);
                        }

                        if max.width > 0 {
                            section.max_size = section.max_size.max(max.width);
                        } else if preferred.width > 0 && !flags.growable(orientation) {
                            section.max_size = section.max_size.max(preferred.width);
                        } else {
                            section.max_size = UNBOUNDED;
                        }
                    }
                    Orientation::Vertical => {
                        if single_span {
                            let min = if hfw {
                                item.height_for_width(self.spanned(
                                    child.range.column,
                                    child.range.column_span,
                                    widths,
                                ))
                            } else {
                                min_size_effective(item).height
                            };
                            section.min_size = section.min_size.max(min);
                        }

                        if max.height > 0 {
                            section.max_size = section.max_size.max(max.height);
                        } else if hfw && !flags.growable(orientation) {
                            section.max_size = section.min_size;
                        } else if preferred.height > 0 && !flags.growable(orientation) {
                            section.max_size = section.max_size.max(preferred.height);
                        } else {
                            section.max_size = UNBOUNDED;
                        }
                    }
                }

                if single_span && flags.greedy(orientation) {
                    if item.role().is_spacer() {
                        section.has_greedy_spacer = true;
                    } else {
                        section.has_greedy_non_spacer = true;
                    }
                }
            }
        }

        let space = space - self.margins.along(orientation);
        let sizes = section::distribute(&sections, space, self.spacing);
        tracing::trace!(target: targets::LAYOUT, ?orientation, space, ?sizes, "resolved sections");
        sizes
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// Compute the bounds of every visible item inside the client size.
    ///
    /// Results are in child order and relative to the client area.
    pub fn perform_layout(&self) -> Vec<LayoutResultItem> {
        let client = self.geometry.client_size;
        let widths = self.section_sizes(Orientation::Horizontal, client.width, &[]);
        let heights = self.section_sizes(Orientation::Vertical, client.height, &widths);

        let mut results = Vec::with_capacity(self.children.len());

        for (index, child) in self.children.iter().enumerate() {
            let item = child.item.as_ref();
            if !should_layout(item) {
                continue;
            }
            let range = child.range;

            let mut x = self.margins.left + self.offset(range.column, &widths);
            let mut y = self.margins.top + self.offset(range.row, &heights);
            let width = self.spanned(range.column, range.column_span, &widths);
            let height = self.spanned(range.row, range.row_span, &heights);

            let (mut w, mut h) = (width, height);

            let flags = item.layout_flags();
            let growable_h = flags.growable(Orientation::Horizontal);
            let growable_v = flags.growable(Orientation::Vertical);
            if !growable_h || !growable_v {
                let mut ideal = item.ideal_size();
                let max = item.geometry().max_size;

                if max.width > 0 && ideal.width > max.width {
                    ideal.width = max.width;
                }
                if !growable_h {
                    w = ideal.width;
                }

                if item.has_height_for_width() {
                    h = item.height_for_width(w);
                } else {
                    if max.height > 0 && ideal.height > max.height {
                        ideal.height = max.height;
                    }
                    if !growable_v {
                        h = ideal.height;
                    }
                }
            }

            let alignment = item.geometry().alignment.unwrap_or(self.alignment);
            x += align(alignment.horizontal, width, w);
            y += align(alignment.vertical, height, h);

            results.push(LayoutResultItem {
                index,
                widget: child.widget,
                bounds: RectanglePixels::new(x, y, w, h),
            });
        }

        tracing::debug!(
            target: targets::LAYOUT,
            ?client,
            items = results.len(),
            rows = self.row_count(),
            columns = self.column_count(),
            "grid layout performed"
        );

        results
    }
}

fn align(alignment: AxisAlignment, available: Pixel, used: Pixel) -> Pixel {
    if used == available {
        return 0;
    }
    match alignment {
        AxisAlignment::Near => 0,
        AxisAlignment::Center => (available - used) / 2,
        AxisAlignment::Far => available - used,
    }
}

impl LayoutItem for GridLayoutItem {
    fn layout_flags(&self) -> LayoutFlags {
        if self.children.is_empty() {
            return LayoutFlags::SHRINKABLE_HORZ
                | LayoutFlags::SHRINKABLE_VERT
                | LayoutFlags::GROWABLE_HORZ
                | LayoutFlags::GROWABLE_VERT;
        }

        let mut flags = LayoutFlags::empty();
        for child in &self.children {
            let item = child.item.as_ref();
            let local_spacer = matches!(item.role(), ItemRole::Spacer { greedy_locally_only: true });
            if local_spacer || !should_layout(item) {
                continue;
            }

            let mut child_flags = item.layout_flags();
            let max = item.geometry().max_size;
            if max.width > 0 {
                child_flags.remove(LayoutFlags::GREEDY_HORZ);
            }
            if max.height > 0 {
                child_flags.remove(LayoutFlags::GREEDY_VERT);
            }

            flags |= child_flags;
        }
        flags
    }

    fn ideal_size(&self) -> SizePixels {
        self.min_size()
    }

    fn min_size(&self) -> SizePixels {
        self.min_size_for_size(self.geometry.client_size)
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    fn has_height_for_width(&self) -> bool {
        self.children
            .iter()
            .any(|c| should_layout(c.item.as_ref()) && c.item.has_height_for_width())
    }

    fn height_for_width(&self, width: Pixel) -> Pixel {
        self.min_size_for_size(SizePixels::new(width, self.geometry.client_size.height))
            .height
    }
}

static_assertions::assert_impl_all!(GridLayoutItem: Send, Sync);
