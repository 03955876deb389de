//! Widget lookup for layout passes.
//!
//! Layouts only store [`ObjectId`]s. When a layout builds its per-pass
//! snapshot it resolves those ids through a [`WidgetAccess`] implementation,
//! so any widget storage can back a layout.
//!
//! ```ignore
//! use horizon_trellis::widget::{Widget, WidgetAccess};
//!
//! struct MyWidgetStorage {
//!     widgets: Vec<Box<dyn Widget>>,
//! }
//!
//! impl WidgetAccess for MyWidgetStorage {
//!     fn get_widget(&self, id: ObjectId) -> Option<&dyn Widget> {
//!         self.widgets.iter().find(|w| w.object_id() == id).map(|w| w.as_ref())
//!     }
//!
//!     fn get_widget_mut(&mut self, id: ObjectId) -> Option<&mut (dyn Widget + 'static)> {
//!         self.widgets.iter_mut().find(|w| w.object_id() == id).map(|w| w.as_mut())
//!     }
//! }
//! ```

use std::collections::HashMap;

use horizon_trellis_core::ObjectId;

use super::Widget;

/// Trait for accessing widgets by their ObjectId.
pub trait WidgetAccess {
    /// Get an immutable reference to a widget by ID.
    fn get_widget(&self, id: ObjectId) -> Option<&dyn Widget>;

    /// Get a mutable reference to a widget by ID.
    fn get_widget_mut(&mut self, id: ObjectId) -> Option<&mut (dyn Widget + 'static)>;
}

impl WidgetAccess for HashMap<ObjectId, Box<dyn Widget>> {
    fn get_widget(&self, id: ObjectId) -> Option<&dyn Widget> {
        self.get(&id).map(|w| w.as_ref())
    }

    fn get_widget_mut(&mut self, id: ObjectId) -> Option<&mut (dyn Widget + 'static)> {
        self.get_mut(&id).map(|w| w.as_mut())
    }
}
