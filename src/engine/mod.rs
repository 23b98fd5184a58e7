//! Component Engine - Node registry and tree-scoped values.
//!
//! The engine is the host layer context providers sit on:
//! - Registry: Index allocation, ID mapping, parent links, parent context
//! - Provided: Values published by a node for its subtree
//!
//! # Architecture
//!
//! Components are NOT objects. They are indices with a parent link:
//!
//! ```text
//! Index 0: root      (parent=-)
//! Index 1: provider  (parent=0, provides slot#3)
//! Index 2: component (parent=1)  -- reads slot#3 from index 1
//! ```
//!
//! Lookups walk parent links, so a value published at a node is visible to
//! its whole subtree and to nothing else.

mod provided;
mod registry;

pub use provided::{lookup_value, provide_value, provides, SlotId};
pub use registry::*;
