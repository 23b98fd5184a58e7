//! # spark-context
//!
//! Provider/accessor context factory for reactive component trees.
//!
//! Built on [spark-signals](https://crates.io/crates/spark-signals) for
//! state and effects.
//!
//! ## Overview
//!
//! [`create_context`] turns a value-producing function into a pair:
//!
//! - a [`Provider`] component that runs the function when it renders and
//!   publishes the result for its subtree
//! - an [`Accessor`] that descendants call to read the nearest published
//!   value, failing with [`MissingProviderError`] when there is none
//!
//! The value-producing function may create signals and effects. They live
//! exactly as long as the provider that ran it.
//!
//! ```ignore
//! use spark_context::{create_context, mount, Signal};
//! use spark_signals::signal;
//!
//! #[derive(Clone)]
//! struct Counter { count: Signal<i32> }
//!
//! let (counter_provider, use_counter) = create_context(|| Counter { count: signal(0) }, None);
//!
//! let app = mount(move || {
//!     counter_provider.render(move || {
//!         let counter = use_counter.use_value();
//!         counter.count.set(counter.count.get() + 1);
//!     });
//! });
//! ```
//!
//! ## Modules
//!
//! - [`context`] - The factory, provider, accessor, and slot
//! - [`engine`] - Component registry and tree-scoped value storage
//! - [`primitives`] - Plain grouping component
//! - [`pipeline`] - Mounting an application root
//! - [`state`] - Keyboard event bus and terminal input

pub mod context;
pub mod engine;
pub mod pipeline;
pub mod primitives;
pub mod state;

pub use context::{
    create_context, create_context_with, create_named_context, Accessor, ContextOptions,
    ContextSlot, MissingProviderError, Provider, SlotRead,
};

pub use engine::{
    allocate_index, get_allocated_count, get_current_parent_index, get_index, is_allocated,
    node_ref, on_destroy, pop_parent_context, push_parent_context, release_index,
    reset_registry, with_parent_context, NodeRef, SlotId,
};

pub use pipeline::{mount, MountHandle};

pub use primitives::{component, on_cleanup, Children, Cleanup, ComponentProps};

pub use state::{input, keyboard, KeyState, KeyboardEvent, Modifiers};

pub use spark_signals::Signal;
