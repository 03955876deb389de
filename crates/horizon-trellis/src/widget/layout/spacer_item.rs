//! Layout item for spacers.

use horizon_trellis_render::{Size, SizePixels};

use super::item::{Geometry, ItemRole, LayoutFlags, LayoutItem};
use super::LayoutContext;

/// A content-free item that only claims space.
///
/// Its ideal and minimum sizes are both its size hint in pixels.
#[derive(Debug, Clone)]
pub struct SpacerLayoutItem {
    geometry: Geometry,
    flags: LayoutFlags,
    size: SizePixels,
    greedy_locally_only: bool,
}

impl SpacerLayoutItem {
    /// Create a spacer item with a 96-dpi size hint.
    pub fn new(ctx: &LayoutContext, flags: LayoutFlags, size_hint: Size, greedy_locally_only: bool) -> Self {
        Self {
            geometry: Geometry::default(),
            flags,
            size: size_hint.to_pixels(ctx.dpi()),
            greedy_locally_only,
        }
    }
}

impl LayoutItem for SpacerLayoutItem {
    fn role(&self) -> ItemRole {
        ItemRole::Spacer {
            greedy_locally_only: self.greedy_locally_only,
        }
    }

    fn layout_flags(&self) -> LayoutFlags {
        self.flags
    }

    fn ideal_size(&self) -> SizePixels {
        self.size
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }
}
