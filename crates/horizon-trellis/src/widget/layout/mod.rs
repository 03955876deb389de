//! Grid layout system.
//!
//! This module provides the layout architecture:
//!
//! - [`LayoutItem`] trait: the view of a widget the layout engine works with
//! - [`GridLayout`]: the mutable cell/stretch-factor model owned by a container
//! - [`GridLayoutItem`]: a per-pass snapshot of the model that computes
//!   section sizes, the grid's minimum size and the final item bounds
//! - [`SpacerLayoutItem`]: the item behind spacer widgets
//! - [`ContentMargins`]: spacing around layout content
//!
//! # Layout Algorithm
//!
//! Column widths are computed first, independent of rows. Row heights are
//! computed second and may depend on the column widths through items that
//! have a height-for-width relationship. Space on each axis is distributed
//! section by section, in priority order:
//!
//! 1. Sections holding a greedy item that is not a spacer
//! 2. Sections holding a greedy spacer
//! 3. Everything else
//!
//! Within a tier, sections with a larger minimum go first, then sections with
//! a smaller `max / stretch` ratio. Each section receives its minimum plus its
//! stretch share of whatever space is still unclaimed at that point, clamped
//! to its maximum, so leftover space cascades to later sections.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::widget::layout::{GridLayoutItem, GridRange, LayoutContext, LayoutItem};
//! use horizon_trellis::render::SizePixels;
//!
//! let ctx = LayoutContext::new(96);
//! let mut grid = GridLayoutItem::new(&ctx);
//! grid.geometry_mut().client_size = SizePixels::new(220, 100);
//! assert!(grid.perform_layout().is_empty());
//! # let _ = GridRange::new(0, 0, 1, 1);
//! ```

mod grid_layout;
mod grid_layout_item;
mod item;
mod section;
mod spacer_item;

use std::sync::Arc;

use horizon_trellis_core::ThreadPool;
use horizon_trellis_render::{Pixel, int_from_96dpi};
use serde::{Deserialize, Serialize};

pub use grid_layout::{GridLayout, GridRange};
pub(crate) use grid_layout::ContainerLink;
pub use grid_layout_item::GridLayoutItem;
pub use item::{
    AxisAlignment, CellAlignment, Geometry, ItemRole, LayoutFlags, LayoutItem, LayoutResultItem,
    min_size_effective, should_layout,
};
pub use spacer_item::SpacerLayoutItem;

use crate::config::DEFAULT_PARALLEL_ROW_THRESHOLD;

/// Content margins around a layout.
///
/// Values are 96-dpi logical units unless returned by [`to_pixels`](Self::to_pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentMargins {
    /// Left margin.
    pub left: i32,
    /// Top margin.
    pub top: i32,
    /// Right margin.
    pub right: i32,
    /// Bottom margin.
    pub bottom: i32,
}

impl ContentMargins {
    /// Create new content margins.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create uniform margins (same value on all sides).
    pub const fn uniform(margin: i32) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    /// Create symmetric margins (same horizontal and vertical).
    pub const fn symmetric(horizontal: i32, vertical: i32) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    /// Total horizontal margin (left + right).
    #[inline]
    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Total vertical margin (top + bottom).
    #[inline]
    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// Total margin along `orientation`.
    #[inline]
    pub fn along(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Horizontal => self.horizontal(),
            Orientation::Vertical => self.vertical(),
        }
    }

    /// Convert 96-dpi margins to device pixels.
    pub fn to_pixels(self, dpi: i32) -> Self {
        Self::new(
            int_from_96dpi(self.left, dpi),
            int_from_96dpi(self.top, dpi),
            int_from_96dpi(self.right, dpi),
            int_from_96dpi(self.bottom, dpi),
        )
    }
}

/// Default spacing between sections, in 96-dpi units.
pub const DEFAULT_SPACING: i32 = 6;

/// Default content margins for layouts, in 96-dpi units.
pub const DEFAULT_MARGINS: ContentMargins = ContentMargins::uniform(9);

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Columns, widths.
    Horizontal,
    /// Rows, heights.
    Vertical,
}

/// Per-pass inputs to layout item creation and computation.
#[derive(Debug, Clone)]
pub struct LayoutContext {
    dpi: i32,
    pool: Option<Arc<ThreadPool>>,
    parallel_row_threshold: usize,
}

impl LayoutContext {
    /// A context at `dpi` that evaluates everything on the calling thread.
    pub fn new(dpi: i32) -> Self {
        Self {
            dpi,
            pool: None,
            parallel_row_threshold: DEFAULT_PARALLEL_ROW_THRESHOLD,
        }
    }

    /// Evaluate row heights on `pool` once a grid has at least `threshold` rows.
    pub fn with_pool(mut self, pool: Arc<ThreadPool>, threshold: usize) -> Self {
        self.pool = Some(pool);
        self.parallel_row_threshold = threshold;
        self
    }

    /// The same context at another DPI.
    pub fn with_dpi(mut self, dpi: i32) -> Self {
        self.dpi = dpi;
        self
    }

    /// The DPI used to convert 96-dpi values to pixels.
    #[inline]
    pub fn dpi(&self) -> i32 {
        self.dpi
    }

    /// The worker pool for the parallel row pass.
    #[inline]
    pub fn pool(&self) -> Option<&Arc<ThreadPool>> {
        self.pool.as_ref()
    }

    /// Minimum row count for the parallel row pass.
    #[inline]
    pub fn parallel_row_threshold(&self) -> usize {
        self.parallel_row_threshold
    }

    /// Convert a 96-dpi value to pixels at this context's DPI.
    #[inline]
    pub fn to_pixels(&self, value: i32) -> Pixel {
        int_from_96dpi(value, self.dpi)
    }
}
