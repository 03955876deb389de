//! Object model for Horizon Trellis.
//!
//! Provides the base object system with:
//! - Unique object identifiers via arena-based storage
//! - Parent-child ownership relationships with cascade destroy
//! - Object naming and visibility state
//!
//! The grid layout uses the registry to answer membership questions ("is
//! this widget a child of that container?") and visibility questions
//! without holding references into the widget tree.
//!
//! # Key Types
//!
//! - [`Object`] - Base trait that all objects implement
//! - [`ObjectId`] - Unique stable identifier for each object
//! - [`ObjectRegistry`] - Central registry managing all objects
//! - [`SharedObjectRegistry`] - Thread-safe wrapper around [`ObjectRegistry`]

use std::fmt;

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for an object in the registry.
    ///
    /// `ObjectId`s are stable handles that remain valid even as the object tree changes.
    /// They become invalid when the object is destroyed.
    pub struct ObjectId;
}

/// Errors that can occur during object operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// The object ID is invalid or has been destroyed.
    InvalidObjectId,
    /// Attempted to set an object as its own parent/ancestor.
    CircularParentage,
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidObjectId => write!(f, "Invalid or destroyed object ID"),
            Self::CircularParentage => {
                write!(f, "Cannot set an object as its own parent or ancestor")
            }
        }
    }
}

impl std::error::Error for ObjectError {}

/// Result type for object operations.
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;

/// The base trait for everything that lives in the object tree.
pub trait Object: Send + Sync {
    /// The object's registry identifier.
    fn object_id(&self) -> ObjectId;
}

/// Internal data stored in the registry for each object.
struct ObjectData {
    /// Human-readable name for debugging and lookup.
    name: String,
    /// The registered class name (e.g. `"ImageView"`).
    class_name: &'static str,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    /// The object's own visibility, not considering ancestors.
    visible: bool,
}

impl ObjectData {
    fn new(class_name: &'static str) -> Self {
        Self {
            name: String::new(),
            class_name,
            parent: None,
            children: Vec::new(),
            visible: true,
        }
    }
}

/// The central registry that manages all objects and their relationships.
///
/// Uses arena-based storage via SlotMap for stable object IDs and efficient
/// parent-child relationship management.
pub struct ObjectRegistry {
    objects: SlotMap<ObjectId, ObjectData>,
}

impl ObjectRegistry {
    /// Create a new empty object registry.
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
        }
    }

    /// Register a new object of the given class and return its ID.
    pub fn register(&mut self, class_name: &'static str) -> ObjectId {
        let id = self.objects.insert(ObjectData::new(class_name));
        tracing::trace!(target: targets::OBJECT, ?id, class_name, "registered object");
        id
    }

    /// Remove an object and all its children from the registry.
    #[tracing::instrument(skip(self), target = "horizon_trellis_core::object", level = "trace")]
    pub fn destroy(&mut self, id: ObjectId) -> ObjectResult<()> {
        let descendants = self.collect_descendants(id)?;
        tracing::trace!(target: targets::OBJECT, ?id, descendant_count = descendants.len(), "destroying object tree");

        if let Some(parent_id) = self.objects.get(id).and_then(|d| d.parent) {
            if let Some(parent_data) = self.objects.get_mut(parent_id) {
                parent_data.children.retain(|&child| child != id);
            }
        }

        for child_id in descendants {
            self.objects.remove(child_id);
        }
        self.objects.remove(id);

        Ok(())
    }

    /// Collect all descendant IDs in depth-first order (children before parents).
    fn collect_descendants(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut result = Vec::new();
        self.collect_descendants_recursive(id, &mut result)?;
        Ok(result)
    }

    fn collect_descendants_recursive(
        &self,
        id: ObjectId,
        result: &mut Vec<ObjectId>,
    ) -> ObjectResult<()> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        for &child_id in &data.children {
            self.collect_descendants_recursive(child_id, result)?;
            result.push(child_id);
        }
        Ok(())
    }

    /// Check if an object exists in the registry.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Set the parent of an object.
    ///
    /// This handles removing from the old parent and adding to the new parent.
    /// Passing `None` makes the object a root object.
    pub fn set_parent(&mut self, id: ObjectId, new_parent: Option<ObjectId>) -> ObjectResult<()> {
        if !self.objects.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }

        if let Some(parent_id) = new_parent {
            if !self.objects.contains_key(parent_id) {
                return Err(ObjectError::InvalidObjectId);
            }
            if self.is_ancestor_of(id, parent_id) {
                return Err(ObjectError::CircularParentage);
            }
        }

        let old_parent = self.objects.get(id).and_then(|d| d.parent);
        if let Some(old_parent_id) = old_parent {
            if let Some(parent_data) = self.objects.get_mut(old_parent_id) {
                parent_data.children.retain(|&child| child != id);
            }
        }

        if let Some(data) = self.objects.get_mut(id) {
            data.parent = new_parent;
        }

        if let Some(parent_id) = new_parent {
            if let Some(parent_data) = self.objects.get_mut(parent_id) {
                parent_data.children.push(id);
            }
        }

        Ok(())
    }

    /// Check if `potential_ancestor` is an ancestor of (or equal to) `id`.
    fn is_ancestor_of(&self, potential_ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.objects.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// Get the parent of an object.
    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.objects
            .get(id)
            .map(|d| d.parent)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the children of an object.
    pub fn children(&self, id: ObjectId) -> ObjectResult<&[ObjectId]> {
        self.objects
            .get(id)
            .map(|d| d.children.as_slice())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Whether `child` is a direct child of `parent`.
    ///
    /// Destroyed or unknown objects are never children.
    pub fn is_child_of(&self, child: ObjectId, parent: ObjectId) -> bool {
        self.objects
            .get(child)
            .is_some_and(|d| d.parent == Some(parent))
    }

    /// Get the object's name.
    pub fn object_name(&self, id: ObjectId) -> ObjectResult<&str> {
        self.objects
            .get(id)
            .map(|d| d.name.as_str())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Set the object's name.
    pub fn set_object_name(&mut self, id: ObjectId, name: String) -> ObjectResult<()> {
        let data = self.objects.get_mut(id).ok_or(ObjectError::InvalidObjectId)?;
        data.name = name;
        Ok(())
    }

    /// Get the class name the object was registered with.
    pub fn class_name(&self, id: ObjectId) -> ObjectResult<&'static str> {
        self.objects
            .get(id)
            .map(|d| d.class_name)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Set the object's own visibility.
    pub fn set_visible(&mut self, id: ObjectId, visible: bool) -> ObjectResult<()> {
        let data = self.objects.get_mut(id).ok_or(ObjectError::InvalidObjectId)?;
        data.visible = visible;
        Ok(())
    }

    /// The object's own visibility, not considering ancestors.
    pub fn is_visible(&self, id: ObjectId) -> ObjectResult<bool> {
        self.objects
            .get(id)
            .map(|d| d.visible)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the total number of objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe wrapper around [`ObjectRegistry`].
///
/// Provides concurrent read access with exclusive write access via `RwLock`.
pub struct SharedObjectRegistry {
    inner: RwLock<ObjectRegistry>,
}

impl SharedObjectRegistry {
    /// Create a new shared object registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ObjectRegistry::new()),
        }
    }

    /// Register a new object.
    pub fn register(&self, class_name: &'static str) -> ObjectId {
        self.inner.write().register(class_name)
    }

    /// Destroy an object and its children.
    pub fn destroy(&self, id: ObjectId) -> ObjectResult<()> {
        self.inner.write().destroy(id)
    }

    /// Check if an object exists.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.inner.read().contains(id)
    }

    /// Set the parent of an object.
    pub fn set_parent(&self, id: ObjectId, parent: Option<ObjectId>) -> ObjectResult<()> {
        self.inner.write().set_parent(id, parent)
    }

    /// Get the parent of an object.
    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.inner.read().parent(id)
    }

    /// Get the children of an object (returns owned Vec for thread safety).
    pub fn children(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        self.inner.read().children(id).map(|c| c.to_vec())
    }

    /// Whether `child` is a direct child of `parent`.
    pub fn is_child_of(&self, child: ObjectId, parent: ObjectId) -> bool {
        self.inner.read().is_child_of(child, parent)
    }

    /// Get the object's name.
    pub fn object_name(&self, id: ObjectId) -> ObjectResult<String> {
        self.inner.read().object_name(id).map(|s| s.to_string())
    }

    /// Set the object's name.
    pub fn set_object_name(&self, id: ObjectId, name: String) -> ObjectResult<()> {
        self.inner.write().set_object_name(id, name)
    }

    /// Get the class name the object was registered with.
    pub fn class_name(&self, id: ObjectId) -> ObjectResult<&'static str> {
        self.inner.read().class_name(id)
    }

    /// Set the object's own visibility.
    pub fn set_visible(&self, id: ObjectId, visible: bool) -> ObjectResult<()> {
        self.inner.write().set_visible(id, visible)
    }

    /// The object's own visibility.
    pub fn is_visible(&self, id: ObjectId) -> ObjectResult<bool> {
        self.inner.read().is_visible(id)
    }

    /// Get the total number of objects.
    pub fn object_count(&self) -> usize {
        self.inner.read().object_count()
    }
}

impl Default for SharedObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(SharedObjectRegistry: Send, Sync);
