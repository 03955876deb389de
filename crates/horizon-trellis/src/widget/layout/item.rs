//! Layout items.
//!
//! A [`LayoutItem`] is what the grid engine sees of a widget: its size
//! preferences, its layout flags and a mutable [`Geometry`]. Items are built
//! fresh for each layout pass, so the engine never touches live widgets.

use std::fmt;

use bitflags::bitflags;
use horizon_trellis_core::ObjectId;
use horizon_trellis_render::{Pixel, RectanglePixels, SizePixels};

use super::Orientation;

bitflags! {
    /// How an item may deviate from its ideal size.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayoutFlags: u8 {
        /// May be narrower than its ideal width.
        const SHRINKABLE_HORZ = 1 << 0;
        /// May be shorter than its ideal height.
        const SHRINKABLE_VERT = 1 << 1;
        /// May be wider than its ideal width.
        const GROWABLE_HORZ = 1 << 2;
        /// May be taller than its ideal height.
        const GROWABLE_VERT = 1 << 3;
        /// Claims leftover width ahead of non-greedy siblings.
        const GREEDY_HORZ = 1 << 4;
        /// Claims leftover height ahead of non-greedy siblings.
        const GREEDY_VERT = 1 << 5;
    }
}

impl LayoutFlags {
    /// Whether the item may shrink along `orientation`.
    #[inline]
    pub fn shrinkable(self, orientation: Orientation) -> bool {
        match orientation {
            Orientation::Horizontal => self.contains(Self::SHRINKABLE_HORZ),
            Orientation::Vertical => self.contains(Self::SHRINKABLE_VERT),
        }
    }

    /// Whether the item may grow along `orientation`.
    #[inline]
    pub fn growable(self, orientation: Orientation) -> bool {
        match orientation {
            Orientation::Horizontal => self.contains(Self::GROWABLE_HORZ),
            Orientation::Vertical => self.contains(Self::GROWABLE_VERT),
        }
    }

    /// Whether the item is greedy along `orientation`.
    #[inline]
    pub fn greedy(self, orientation: Orientation) -> bool {
        match orientation {
            Orientation::Horizontal => self.contains(Self::GREEDY_HORZ),
            Orientation::Vertical => self.contains(Self::GREEDY_VERT),
        }
    }
}

/// Placement of an item within the extra space of its cell on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisAlignment {
    /// Left or top.
    #[default]
    Near,
    /// Centered.
    Center,
    /// Right or bottom.
    Far,
}

/// Alignment within a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellAlignment {
    /// Horizontal alignment.
    pub horizontal: AxisAlignment,
    /// Vertical alignment.
    pub vertical: AxisAlignment,
}

impl CellAlignment {
    /// Top-left; the layout default.
    pub const NEAR: Self = Self::new(AxisAlignment::Near, AxisAlignment::Near);

    /// Create a new cell alignment.
    pub const fn new(horizontal: AxisAlignment, vertical: AxisAlignment) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Center in both directions.
    pub const fn center() -> Self {
        Self::new(AxisAlignment::Center, AxisAlignment::Center)
    }

    /// Align to bottom-right.
    pub const fn far() -> Self {
        Self::new(AxisAlignment::Far, AxisAlignment::Far)
    }

    /// The alignment along `orientation`.
    #[inline]
    pub fn along(&self, orientation: Orientation) -> AxisAlignment {
        match orientation {
            Orientation::Horizontal => self.horizontal,
            Orientation::Vertical => self.vertical,
        }
    }
}

/// The mutable geometry record of a layout item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Alignment within the cell; `None` uses the layout's default.
    pub alignment: Option<CellAlignment>,
    /// Declared minimum size in pixels.
    pub min_size: SizePixels,
    /// Declared maximum size in pixels; 0 on an axis means unbounded.
    pub max_size: SizePixels,
    /// Size of the item's client area.
    pub client_size: SizePixels,
    /// Bounds assigned by the last layout pass.
    pub bounds: RectanglePixels,
    /// Whether the item takes part in layout.
    pub visible: bool,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            alignment: None,
            min_size: SizePixels::ZERO,
            max_size: SizePixels::ZERO,
            client_size: SizePixels::ZERO,
            bounds: RectanglePixels::default(),
            visible: true,
        }
    }
}

/// What kind of item the engine is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItemRole {
    /// A regular widget or nested layout.
    #[default]
    Content,
    /// A spacer. Greedy spacers rank below greedy content.
    Spacer {
        /// The spacer's greediness does not propagate to enclosing layouts.
        greedy_locally_only: bool,
    },
}

impl ItemRole {
    /// Whether this is a spacer.
    #[inline]
    pub fn is_spacer(self) -> bool {
        matches!(self, Self::Spacer { .. })
    }
}

/// An item that can be placed by a layout.
pub trait LayoutItem: Send + Sync + fmt::Debug {
    /// The kind of item.
    fn role(&self) -> ItemRole {
        ItemRole::Content
    }

    /// How the item may deviate from its ideal size.
    fn layout_flags(&self) -> LayoutFlags;

    /// The preferred size in pixels.
    fn ideal_size(&self) -> SizePixels;

    /// The smallest useful size in pixels.
    fn min_size(&self) -> SizePixels {
        self.ideal_size()
    }

    /// The item's geometry record.
    fn geometry(&self) -> &Geometry;

    /// Mutable access to the item's geometry record.
    fn geometry_mut(&mut self) -> &mut Geometry;

    /// Whether the item's height depends on its width.
    fn has_height_for_width(&self) -> bool {
        false
    }

    /// The height the item needs at `width`.
    ///
    /// Only consulted when [`has_height_for_width`](Self::has_height_for_width)
    /// returns true.
    fn height_for_width(&self, width: Pixel) -> Pixel {
        let _ = width;
        self.min_size().height
    }
}

/// The final placement of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutResultItem {
    /// Index of the item in the layout's child list.
    pub index: usize,
    /// The widget the item was created for, if any.
    pub widget: Option<ObjectId>,
    /// Bounds relative to the container's client area.
    pub bounds: RectanglePixels,
}

/// Whether `item` takes part in layout.
#[inline]
pub fn should_layout(item: &dyn LayoutItem) -> bool {
    item.geometry().visible
}

/// The minimum size the engine enforces for `item`.
///
/// On axes where the item is not shrinkable the ideal size is the minimum.
/// The geometry's declared minimum raises it and the declared maximum caps it.
pub fn min_size_effective(item: &dyn LayoutItem) -> SizePixels {
    let geometry = item.geometry();
    let flags = item.layout_flags();

    let mut size = item.min_size();

    if !flags.shrinkable(Orientation::Horizontal) || !flags.shrinkable(Orientation::Vertical) {
        let ideal = item.ideal_size();
        if !flags.shrinkable(Orientation::Horizontal) {
            size.width = size.width.max(ideal.width);
        }
        if !flags.shrinkable(Orientation::Vertical) {
            size.height = size.height.max(ideal.height);
        }
    }

    size = size.max(geometry.min_size);

    if geometry.max_size.width > 0 {
        size.width = size.width.min(geometry.max_size.width);
    }
    if geometry.max_size.height > 0 {
        size.height = size.height.min(geometry.max_size.height);
    }

    size
}
