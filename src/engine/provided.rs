//! Provided Values - Tree-scoped broadcast storage.
//!
//! Each node may publish one value per [`SlotId`]. A lookup starts at a node
//! and walks parent links towards the root, returning the first value found,
//! so the nearest publisher shadows any further up the tree.
//!
//! Values are stored type-erased; the typed view lives in
//! [`crate::context::ContextSlot`].

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::registry::get_parent_index;

/// Process-unique identity of a broadcast slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

static NEXT_SLOT_ID: AtomicUsize = AtomicUsize::new(0);

impl SlotId {
    /// Allocate a fresh slot identity.
    pub fn next() -> Self {
        Self(NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric id (for diagnostics).
    pub fn get(self) -> usize {
        self.0
    }
}

thread_local! {
    /// Values published per node, keyed by slot.
    static PROVIDED: RefCell<HashMap<usize, HashMap<SlotId, Rc<dyn Any>>>> = RefCell::new(HashMap::new());
}

/// Publish `value` for `slot` at node `index`, replacing any previous value.
pub fn provide_value(index: usize, slot: SlotId, value: Rc<dyn Any>) {
    PROVIDED.with(|provided| {
        provided
            .borrow_mut()
            .entry(index)
            .or_default()
            .insert(slot, value);
    });
}

/// Find the nearest value for `slot`, starting at `from` and walking up.
///
/// Returns `None` when `from` is `None` (no component is rendering) or when no
/// node on the path publishes the slot.
pub fn lookup_value(from: Option<usize>, slot: SlotId) -> Option<Rc<dyn Any>> {
    let mut current = from;
    while let Some(index) = current {
        let found = PROVIDED.with(|provided| {
            provided
                .borrow()
                .get(&index)
                .and_then(|values| values.get(&slot))
                .cloned()
        });
        if found.is_some() {
            return found;
        }
        current = get_parent_index(index);
    }
    None
}

/// Check whether node `index` itself publishes `slot`.
pub fn provides(index: usize, slot: SlotId) -> bool {
    PROVIDED.with(|provided| {
        provided
            .borrow()
            .get(&index)
            .is_some_and(|values| values.contains_key(&slot))
    })
}

/// Drop every value published at `index`.
pub(crate) fn clear_index(index: usize) {
    // Take outside the borrow: dropping a value may release signals whose
    // teardown touches this table again.
    let removed = PROVIDED.with(|provided| provided.borrow_mut().remove(&index));
    drop(removed);
}

/// Reset provided storage (for testing).
pub(crate) fn reset_provided() {
    let removed = PROVIDED.with(|provided| std::mem::take(&mut *provided.borrow_mut()));
    drop(removed);
}
