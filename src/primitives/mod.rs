//! Primitives - Component building blocks.
//!
//! - [`component`] - Plain grouping node that renders children under itself
//! - [`on_cleanup`] - Run a one-shot teardown when the current node unmounts
//!
//! # Architecture
//!
//! Components are indices in the engine registry. Each component:
//! 1. Allocates an index under the current parent
//! 2. Renders its children with itself as the parent context
//! 3. Returns a cleanup function that releases the subtree
//!
//! Context providers ([`crate::context::Provider`]) are components too; they
//! additionally publish a value at their index.

mod component;
mod types;

pub use component::{component, on_cleanup};
pub(crate) use component::render_node;
pub use types::*;
