//! Prelude module for Horizon Trellis.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use horizon_trellis::prelude::*;
//! ```
//!
//! This provides access to:
//! - Toolkit startup (`Toolkit`, `ToolkitConfig`)
//! - Signal and object system (`Signal`, `Object`, `ObjectId`)
//! - Widget foundation (`Widget`, `WidgetBase`)
//! - Widgets (`Container`, `Spacer`, `ImageView`)
//! - Grid layout (`GridLayout`, `GridRange`, `LayoutFlags`, etc.)
//! - Geometry and drawing types (`Size`, `SizePixels`, `Image`, `Canvas`)

// ============================================================================
// Toolkit
// ============================================================================

pub use crate::config::{LayoutConfig, ThreadPoolSettings, ToolkitConfig};
pub use crate::toolkit::Toolkit;

// ============================================================================
// Errors
// ============================================================================

pub use crate::{ConfigError, LayoutError, WidgetError};

// ============================================================================
// Signal and Object System
// ============================================================================

pub use horizon_trellis_core::{ConnectionId, Object, ObjectId, Signal};

// ============================================================================
// Widget Foundation
// ============================================================================

pub use crate::widget::{Widget, WidgetAccess, WidgetBase};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::widgets::{Container, ImageView, ImageViewMode, Spacer, SpacerConfig};

// ============================================================================
// Layout System
// ============================================================================

pub use crate::widget::layout::{
    AxisAlignment, CellAlignment, ContentMargins, GridLayout, GridRange, LayoutContext,
    LayoutFlags, LayoutItem, LayoutResultItem,
};

// ============================================================================
// Geometry and Drawing
// ============================================================================

pub use horizon_trellis_render::{
    Bitmap, Canvas, Image, Metafile, Point, PointPixels, RasterCanvas, Rectangle,
    RectanglePixels, RecordingCanvas, RenderError, RenderResult, Size, SizePixels,
};
