//! Context Slot - Typed view over the engine's provided-value storage.

use std::fmt;
use std::rc::Rc;

use crate::engine::{get_current_parent_index, lookup_value, provide_value, SlotId};

/// Result of reading a slot at some position in the tree.
///
/// `Unset` is the sentinel for "no provider above this position". It is kept
/// apart from the slot's default so a default can never hide a missing
/// provider.
#[derive(Debug)]
pub enum SlotRead<T> {
    /// No provider publishes this slot on the path to the root.
    Unset,
    /// Value published by the nearest provider.
    Provided(Rc<T>),
}

impl<T> SlotRead<T> {
    /// True when no provider was found.
    pub fn is_unset(&self) -> bool {
        matches!(self, SlotRead::Unset)
    }
}

/// A broadcast channel for values of type `T`, scoped to subtrees.
///
/// One slot is created per context factory call and shared by the provider
/// and accessor built from it.
pub struct ContextSlot<T> {
    id: SlotId,
    name: String,
    default: Option<T>,
}

impl<T: 'static> ContextSlot<T> {
    /// Create a slot with a fresh identity.
    pub fn new(name: impl Into<String>, default: Option<T>) -> Self {
        Self {
            id: SlotId::next(),
            name: name.into(),
            default,
        }
    }

    /// Slot identity.
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Label used in errors and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The default the slot was seeded with, if any.
    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    /// Publish `value` for the subtree rooted at node `index`.
    pub fn provide(&self, index: usize, value: T) {
        provide_value(index, self.id, Rc::new(value));
    }

    /// Read the nearest published value above the current parent.
    pub fn read(&self) -> SlotRead<T> {
        self.read_from(get_current_parent_index())
    }

    /// Read the nearest published value starting at node `index`.
    pub fn read_from(&self, index: Option<usize>) -> SlotRead<T> {
        lookup_value(index, self.id)
            .and_then(|value| value.downcast::<T>().ok())
            .map_or(SlotRead::Unset, SlotRead::Provided)
    }
}

impl<T: Clone + 'static> ContextSlot<T> {
    /// Raw read: the nearest published value, else the default.
    ///
    /// This is what an unguarded consumer would see. Accessors do not use it.
    pub fn get_or_default(&self) -> Option<T> {
        match self.read() {
            SlotRead::Provided(value) => Some((*value).clone()),
            SlotRead::Unset => self.default.clone(),
        }
    }
}

impl<T> fmt::Debug for ContextSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextSlot")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}
