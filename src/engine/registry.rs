//! Component Registry - Node indices and tree structure.
//!
//! Manages the lifecycle of component nodes:
//! - ID ↔ Index bidirectional mapping
//! - Free index pool for O(1) reuse
//! - Parent links so descendants can walk up to their providers
//! - Parent context stack for nested component creation
//! - Destroy callbacks for unmount-time teardown
//! - Allocation generations so stale handles never touch a recycled index

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::provided;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map component ID to node index.
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Map node index to component ID.
    static INDEX_TO_ID: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());

    /// Set of currently allocated indices.
    static ALLOCATED_INDICES: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());

    /// Parent link per allocated index (absent for roots).
    static PARENTS: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };

    /// Next index to allocate if pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Counter for generating unique IDs.
    static ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };

    /// Generation stamped on each index when it is allocated.
    static GENERATIONS: RefCell<HashMap<usize, u64>> = RefCell::new(HashMap::new());

    /// Source of allocation generations. Never reset.
    static NEXT_GENERATION: RefCell<u64> = const { RefCell::new(0) };

    /// Stack of parent indices for nested component creation.
    static PARENT_STACK: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };

    /// Destroy callbacks registered per index.
    static DESTROY_CALLBACKS: RefCell<HashMap<usize, Vec<Box<dyn FnOnce()>>>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Parent Context Stack
// =============================================================================

/// Get current parent index (None if rendering at the root).
pub fn get_current_parent_index() -> Option<usize> {
    PARENT_STACK.with(|stack| stack.borrow().last().copied())
}

/// Push a parent index onto the stack.
pub fn push_parent_context(index: usize) {
    PARENT_STACK.with(|stack| stack.borrow_mut().push(index));
}

/// Pop a parent index from the stack.
pub fn pop_parent_context() {
    PARENT_STACK.with(|stack| {
        stack.borrow_mut().pop();
    });
}

/// Run `f` with `index` as the current parent.
///
/// The stack is restored even when `f` unwinds, so a failed accessor call
/// deep inside a subtree does not leave stale parents behind.
pub fn with_parent_context<R>(index: usize, f: impl FnOnce() -> R) -> R {
    struct Restore;

    impl Drop for Restore {
        fn drop(&mut self) {
            pop_parent_context();
        }
    }

    push_parent_context(index);
    let _restore = Restore;
    f()
}

// =============================================================================
// Parent Links
// =============================================================================

/// Record the parent of a node.
pub fn set_parent_index(index: usize, parent: Option<usize>) {
    PARENTS.with(|parents| {
        let mut parents = parents.borrow_mut();
        match parent {
            Some(p) => parents.insert(index, p),
            None => parents.remove(&index),
        };
    });
}

/// Get the parent of a node.
pub fn get_parent_index(index: usize) -> Option<usize> {
    PARENTS.with(|parents| parents.borrow().get(&index).copied())
}

// =============================================================================
// Index Allocation
// =============================================================================

/// Allocate an index for a new component.
///
/// # Arguments
/// * `id` - Optional component ID. If not provided, one is generated.
///
/// # Returns
/// The allocated index. An ID that is already allocated returns its index.
pub fn allocate_index(id: Option<&str>) -> usize {
    let component_id = match id {
        Some(id) => id.to_string(),
        None => ID_COUNTER.with(|counter| {
            let mut counter = counter.borrow_mut();
            let id = format!("c{}", *counter);
            *counter += 1;
            id
        }),
    };

    let existing = ID_TO_INDEX.with(|map| map.borrow().get(&component_id).copied());
    if let Some(index) = existing {
        return index;
    }

    let index = FREE_INDICES.with(|free| {
        free.borrow_mut().pop().unwrap_or_else(|| {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        })
    });

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().insert(component_id.clone(), index);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().insert(index, component_id);
    });
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().insert(index);
    });
    let generation = NEXT_GENERATION.with(|next| {
        let mut next = next.borrow_mut();
        *next += 1;
        *next
    });
    GENERATIONS.with(|map| {
        map.borrow_mut().insert(index, generation);
    });

    index
}

/// Allocate a node as a child of the current parent context.
pub fn allocate_child(id: Option<&str>) -> usize {
    let index = allocate_index(id);
    set_parent_index(index, get_current_parent_index());
    index
}

/// Allocate a child of the current parent and take a reference to it.
pub fn allocate_node(id: Option<&str>) -> NodeRef {
    let index = allocate_child(id);
    let generation = GENERATIONS.with(|map| map.borrow().get(&index).copied());
    NodeRef {
        index,
        generation: generation.unwrap_or_default(),
    }
}

/// Release an index back to the pool.
///
/// Children are released first, then the node's destroy callbacks run, then
/// its provided values are dropped.
pub fn release_index(index: usize) {
    let id = INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned());
    let Some(id) = id else { return };

    let children: Vec<usize> = PARENTS.with(|parents| {
        parents
            .borrow()
            .iter()
            .filter(|&(_, &parent)| parent == index)
            .map(|(&child, _)| child)
            .collect()
    });

    for child_index in children {
        release_index(child_index);
    }

    run_destroy_callbacks(index);
    provided::clear_index(index);

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().remove(&id);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().remove(&index);
    });
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().remove(&index);
    });
    PARENTS.with(|parents| {
        parents.borrow_mut().remove(&index);
    });
    GENERATIONS.with(|map| {
        map.borrow_mut().remove(&index);
    });

    FREE_INDICES.with(|free| free.borrow_mut().push(index));

    // Empty tree: start numbering from zero again
    let is_empty = ALLOCATED_INDICES.with(|set| set.borrow().is_empty());
    if is_empty {
        FREE_INDICES.with(|free| free.borrow_mut().clear());
        NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    }
}

// =============================================================================
// Node References
// =============================================================================

/// An index plus the generation it was allocated with.
///
/// Indices are recycled, so a bare index can outlive its node and end up
/// naming an unrelated one. A `NodeRef` only acts while its allocation is
/// still the live one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeRef {
    index: usize,
    generation: u64,
}

impl NodeRef {
    /// Index this reference was taken for.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the node is still allocated under the same generation.
    pub fn is_current(&self) -> bool {
        GENERATIONS.with(|map| map.borrow().get(&self.index) == Some(&self.generation))
    }

    /// Release the node if it is still current. Returns whether it was.
    pub fn release(self) -> bool {
        if !self.is_current() {
            return false;
        }
        release_index(self.index);
        true
    }
}

/// Take a reference to the live allocation at `index`.
pub fn node_ref(index: usize) -> Option<NodeRef> {
    GENERATIONS.with(|map| {
        map.borrow()
            .get(&index)
            .map(|&generation| NodeRef { index, generation })
    })
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when the component at `index` is destroyed.
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) {
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(index)
            .or_default()
            .push(Box::new(callback));
    });
}

/// Run and clear destroy callbacks for an index.
fn run_destroy_callbacks(index: usize) {
    let callbacks = DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().remove(&index));
    if let Some(callbacks) = callbacks {
        for callback in callbacks {
            callback();
        }
    }
}

// =============================================================================
// Lookups
// =============================================================================

/// Get index for a component ID.
pub fn get_index(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

/// Get ID for an index.
pub fn get_id(index: usize) -> Option<String> {
    INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED_INDICES.with(|set| set.borrow().contains(&index))
}

/// Get the count of currently allocated components.
pub fn get_allocated_count() -> usize {
    ALLOCATED_INDICES.with(|set| set.borrow().len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
///
/// Nodes still mounted are released first, so their destroy callbacks run.
pub fn reset_registry() {
    PARENT_STACK.with(|stack| stack.borrow_mut().clear());
    let roots: Vec<usize> = ALLOCATED_INDICES.with(|set| {
        set.borrow()
            .iter()
            .copied()
            .filter(|&index| get_parent_index(index).is_none())
            .collect()
    });
    for root in roots {
        release_index(root);
    }

    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    INDEX_TO_ID.with(|map| map.borrow_mut().clear());
    ALLOCATED_INDICES.with(|set| set.borrow_mut().clear());
    PARENTS.with(|parents| parents.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    ID_COUNTER.with(|counter| *counter.borrow_mut() = 0);
    GENERATIONS.with(|map| map.borrow_mut().clear());
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().clear());
    provided::reset_provided();
}
