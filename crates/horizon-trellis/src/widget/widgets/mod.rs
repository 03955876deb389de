//! Standard widgets for Horizon Trellis.
//!
//! - [`Container`]: Owns child widgets and lays them out on a grid
//! - [`Spacer`]: Empty space that claims stretch or greedy space
//! - [`ImageView`]: Paints an image under one of several fit modes

mod container;
mod image_view;
mod spacer;

pub use container::Container;
pub use image_view::{ImageView, ImageViewMode};
pub use spacer::{Spacer, SpacerConfig};
