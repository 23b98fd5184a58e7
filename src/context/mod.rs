//! Context - Share a computed value with a subtree.
//!
//! - [`create_context`] - Build a provider/accessor pair around a new slot
//! - [`Provider`] - Component that computes and publishes the value
//! - [`Accessor`] - Reads the nearest published value, or fails
//! - [`ContextSlot`] - The typed broadcast channel both share
//!
//! # Missing providers
//!
//! An accessor never falls back to the context's default. Reading with no
//! provider above the current position yields [`MissingProviderError`]
//! (or a panic through [`Accessor::use_value`]). The default is only visible
//! through [`ContextSlot::get_or_default`].

mod error;
mod factory;
mod slot;

pub use error::MissingProviderError;
pub use factory::{
    create_context, create_context_with, create_named_context, Accessor, ContextOptions, Provider,
};
pub use slot::{ContextSlot, SlotRead};
