//! Widget system for Horizon Trellis.
//!
//! This module provides the widget architecture:
//!
//! - [`Widget`] trait: The base trait for everything a container holds
//! - [`WidgetBase`]: Common implementation for widget functionality
//! - [`WidgetAccess`]: Widget lookup used when a layout builds its snapshot
//! - [`layout`]: The grid layout model and engine
//! - [`widgets`]: Container, spacer and image view
//!
//! # Creating a Widget
//!
//! 1. Define a struct with a `WidgetBase` field
//! 2. Implement `Object` and `Widget`
//! 3. Return a layout item from `create_layout_item()`
//! 4. Implement `paint()` if the widget draws anything
//!
//! Widget classes must be registered with the [`Toolkit`](crate::toolkit::Toolkit)
//! before the first instance is created.

mod base;
mod dispatcher;
pub mod layout;
mod traits;
pub mod widgets;

pub use base::WidgetBase;
pub use dispatcher::WidgetAccess;
pub use traits::Widget;
