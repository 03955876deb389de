//! Horizon Trellis - grid layout, spacers and image views.
//!
//! This is the main umbrella crate. It re-exports the core object and signal
//! systems, exposes the render crate as [`render`], and provides the toolkit
//! startup, the widget layer and the grid layout engine.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::config::ToolkitConfig;
//! use horizon_trellis::toolkit::Toolkit;
//! use horizon_trellis::widget::layout::{GridLayout, GridRange};
//! use horizon_trellis::widget::widgets::{Container, Spacer};
//! use horizon_trellis::widget::Widget;
//! use horizon_trellis::render::SizePixels;
//!
//! let toolkit = Toolkit::init(ToolkitConfig::default()).unwrap();
//!
//! let mut container = Container::new(&toolkit).unwrap();
//! container.set_layout(GridLayout::new());
//!
//! let spacer = Spacer::h_spacer(&toolkit).unwrap();
//! let spacer_id = container.add_child(Box::new(spacer)).unwrap();
//! container
//!     .set_range(spacer_id, GridRange::new(0, 0, 1, 1))
//!     .unwrap();
//!
//! container.resize(SizePixels::new(200, 100));
//! container.perform_layout();
//!
//! let bounds = container.child(spacer_id).unwrap().widget_base().bounds();
//! assert_eq!((bounds.x, bounds.y), (9, 9));
//! assert_eq!(bounds.width, 182);
//! ```

pub use horizon_trellis_core::*;

/// Geometry, images and drawing surfaces.
pub mod render {
    pub use horizon_trellis_render::*;
}

pub mod config;
mod error;
pub mod prelude;
pub mod toolkit;
pub mod widget;

pub use error::{ConfigError, LayoutError, WidgetError};
