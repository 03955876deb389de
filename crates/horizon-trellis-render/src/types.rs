//! Geometry primitives.
//!
//! Two families of types live here. The plain types ([`Point`], [`Size`],
//! [`Rectangle`]) are in 96-dpi logical units, the unit widgets and layouts
//! are configured in. The `*Pixels` types are device pixels at some concrete
//! DPI, the unit the layout engine computes and the canvas draws in.

use bytemuck::{Pod, Zeroable};

/// A device pixel coordinate or extent.
pub type Pixel = i32;

/// The DPI at which logical units and device pixels coincide.
pub const BASE_DPI: i32 = 96;

/// Convert a 96-dpi logical value to device pixels at `dpi`, rounding to nearest.
///
/// A non-positive `dpi` is treated as [`BASE_DPI`].
#[inline]
pub fn int_from_96dpi(value: i32, dpi: i32) -> Pixel {
    if dpi <= 0 {
        return value;
    }
    (f64::from(value) * f64::from(dpi) / f64::from(BASE_DPI)).round() as Pixel
}

/// Convert a device pixel value at `dpi` back to 96-dpi logical units.
#[inline]
pub fn int_to_96dpi(value: Pixel, dpi: i32) -> i32 {
    if dpi <= 0 {
        return value;
    }
    (f64::from(value) * f64::from(BASE_DPI) / f64::from(dpi)).round() as i32
}

/// A point in 96-dpi logical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert to device pixels.
    #[inline]
    pub fn to_pixels(self, dpi: i32) -> PointPixels {
        PointPixels::new(int_from_96dpi(self.x, dpi), int_from_96dpi(self.y, dpi))
    }
}

/// A size in 96-dpi logical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Convert to device pixels.
    #[inline]
    pub fn to_pixels(self, dpi: i32) -> SizePixels {
        SizePixels::new(
            int_from_96dpi(self.width, dpi),
            int_from_96dpi(self.height, dpi),
        )
    }
}

/// A rectangle in 96-dpi logical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert to device pixels.
    #[inline]
    pub fn to_pixels(self, dpi: i32) -> RectanglePixels {
        RectanglePixels::new(
            int_from_96dpi(self.x, dpi),
            int_from_96dpi(self.y, dpi),
            int_from_96dpi(self.width, dpi),
            int_from_96dpi(self.height, dpi),
        )
    }
}

/// A point in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct PointPixels {
    pub x: Pixel,
    pub y: Pixel,
}

impl PointPixels {
    /// Create a new point.
    #[inline]
    pub const fn new(x: Pixel, y: Pixel) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };
}

/// A size in device pixels.
///
/// `Hash + Eq` so it can key size caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct SizePixels {
    pub width: Pixel,
    pub height: Pixel,
}

impl SizePixels {
    /// Create a new size.
    #[inline]
    pub const fn new(width: Pixel, height: Pixel) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Check if the size has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Convert to 96-dpi logical units.
    #[inline]
    pub fn to_96dpi(self, dpi: i32) -> Size {
        Size::new(int_to_96dpi(self.width, dpi), int_to_96dpi(self.height, dpi))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }
}

/// A rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct RectanglePixels {
    pub x: Pixel,
    pub y: Pixel,
    pub width: Pixel,
    pub height: Pixel,
}

impl RectanglePixels {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: Pixel, y: Pixel, width: Pixel, height: Pixel) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from a location and a size.
    #[inline]
    pub const fn from_parts(location: PointPixels, size: SizePixels) -> Self {
        Self::new(location.x, location.y, size.width, size.height)
    }

    /// The rectangle's top-left corner.
    #[inline]
    pub fn location(&self) -> PointPixels {
        PointPixels::new(self.x, self.y)
    }

    /// The rectangle's size.
    #[inline]
    pub fn size(&self) -> SizePixels {
        SizePixels::new(self.width, self.height)
    }

    /// The exclusive right edge.
    #[inline]
    pub fn right(&self) -> Pixel {
        self.x + self.width
    }

    /// The exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> Pixel {
        self.y + self.height
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check whether the rectangle contains a pixel.
    #[inline]
    pub fn contains(&self, point: PointPixels) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// The overlap of two rectangles, or `None` if they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > x && bottom > y {
            Some(Self::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Convert to 96-dpi logical units.
    #[inline]
    pub fn to_96dpi(self, dpi: i32) -> Rectangle {
        Rectangle::new(
            int_to_96dpi(self.x, dpi),
            int_to_96dpi(self.y, dpi),
            int_to_96dpi(self.width, dpi),
            int_to_96dpi(self.height, dpi),
        )
    }
}
