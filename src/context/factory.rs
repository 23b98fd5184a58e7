//! Context Factory - Paired provider component and accessor.
//!
//! [`create_context`] takes a value-producing function and returns a
//! [`Provider`] that runs it and publishes the result for its subtree, plus
//! an [`Accessor`] that descendants use to read the nearest published value.
//!
//! The value-producing function runs inside the provider's EffectScope, so it
//! may create signals, start effects, and register teardown with
//! [`on_cleanup`](crate::primitives::on_cleanup). All of that ends when the
//! provider unmounts.
//!
//! # Example
//!
//! ```ignore
//! use spark_context::{create_context, keyboard, on_cleanup};
//! use spark_signals::{signal, Signal};
//!
//! #[derive(Clone)]
//! struct Weapons {
//!     current: Signal<usize>,
//! }
//!
//! let (weapons_provider, use_weapons) = create_context(|| {
//!     let current = signal(0);
//!     let current_for_keys = current.clone();
//!     let off = keyboard::on(move |event| {
//!         match event.code().as_str() {
//!             "Digit1" => { current_for_keys.set(0); }
//!             "Digit2" => { current_for_keys.set(1); }
//!             _ => return false,
//!         }
//!         true
//!     });
//!     on_cleanup(off);
//!     Weapons { current }
//! }, None);
//!
//! let cleanup = weapons_provider.render(move || {
//!     let weapons = use_weapons.use_value();
//!     // read weapons.current inside effects/getters
//! });
//! ```

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::error::MissingProviderError;
use super::slot::{ContextSlot, SlotRead};
use crate::primitives::{render_node, Cleanup, ComponentProps};

// =============================================================================
// Options
// =============================================================================

/// Configuration for [`create_context_with`].
pub struct ContextOptions<T> {
    /// Label for errors and logs. Defaults to the value type's name.
    pub name: Option<String>,

    /// Value seeding the raw slot. Never returned by an accessor.
    pub default: Option<T>,
}

impl<T> Default for ContextOptions<T> {
    fn default() -> Self {
        Self {
            name: None,
            default: None,
        }
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Create a provider/accessor pair around a fresh context slot.
///
/// `compute` runs each time a provider renders. `default` only seeds the raw
/// slot: an accessor with no provider above it still fails.
pub fn create_context<T, F>(compute: F, default: Option<T>) -> (Provider<T>, Accessor<T>)
where
    T: Clone + 'static,
    F: Fn() -> T + 'static,
{
    create_context_with(
        compute,
        ContextOptions {
            name: None,
            default,
        },
    )
}

/// Like [`create_context`], with a label for errors and logs.
pub fn create_named_context<T, F>(
    name: impl Into<String>,
    compute: F,
    default: Option<T>,
) -> (Provider<T>, Accessor<T>)
where
    T: Clone + 'static,
    F: Fn() -> T + 'static,
{
    create_context_with(
        compute,
        ContextOptions {
            name: Some(name.into()),
            default,
        },
    )
}

/// Create a provider/accessor pair from explicit options.
pub fn create_context_with<T, F>(compute: F, options: ContextOptions<T>) -> (Provider<T>, Accessor<T>)
where
    T: Clone + 'static,
    F: Fn() -> T + 'static,
{
    let name = options
        .name
        .unwrap_or_else(|| std::any::type_name::<T>().to_string());
    let slot = Rc::new(ContextSlot::new(name, options.default));
    debug!(context = slot.name(), slot = slot.id().get(), "context created");

    let provider = Provider {
        slot: slot.clone(),
        compute: Rc::new(compute),
    };
    let accessor = Accessor { slot };

    (provider, accessor)
}

// =============================================================================
// Provider
// =============================================================================

/// Component that publishes a computed value for its subtree.
pub struct Provider<T> {
    slot: Rc<ContextSlot<T>>,
    compute: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            compute: self.compute.clone(),
        }
    }
}

impl<T: Clone + 'static> Provider<T> {
    /// Render the provider under the current parent with `children` inside.
    ///
    /// Returns a cleanup function that unmounts the provider, its children,
    /// and everything the computed value started.
    pub fn render(&self, children: impl FnOnce() + 'static) -> Cleanup {
        self.render_with(ComponentProps::with_children(children))
    }

    /// Render the provider from component props.
    pub fn render_with(&self, props: ComponentProps) -> Cleanup {
        let slot = self.slot.clone();
        let compute = self.compute.clone();
        let children = props.children;

        let node = render_node(props.id.as_deref(), move |index| {
            slot.provide(index, compute());
            if let Some(children) = children {
                children();
            }
        });
        debug!(context = self.slot.name(), index = node.index(), "provider mounted");

        let name = self.slot.name().to_string();
        Box::new(move || {
            if node.release() {
                debug!(context = %name, index = node.index(), "provider unmounted");
            }
        })
    }

    /// The slot this provider publishes into.
    pub fn slot(&self) -> &ContextSlot<T> {
        &self.slot
    }
}

impl<T> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider").field("slot", &self.slot).finish()
    }
}

// =============================================================================
// Accessor
// =============================================================================

/// Reads the value published by the nearest matching provider.
pub struct Accessor<T> {
    slot: Rc<ContextSlot<T>>,
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Clone + 'static> Accessor<T> {
    /// Read the value for the current position in the tree.
    ///
    /// Call while a component renders. Fails with [`MissingProviderError`]
    /// when no provider from the same factory call is above this position,
    /// whether or not the context has a default.
    pub fn try_use(&self) -> Result<T, MissingProviderError> {
        match self.slot.read() {
            SlotRead::Provided(value) => Ok((*value).clone()),
            SlotRead::Unset => {
                debug!(context = self.slot.name(), "accessor used outside its provider");
                Err(MissingProviderError::new(self.slot.name()))
            }
        }
    }

    /// Read the value for the current position in the tree.
    ///
    /// # Panics
    ///
    /// Panics with the [`MissingProviderError`] message when no matching
    /// provider is above this position. Use [`Accessor::try_use`] to handle
    /// that case instead.
    pub fn use_value(&self) -> T {
        match self.try_use() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// The slot this accessor reads from.
    pub fn slot(&self) -> &ContextSlot<T> {
        &self.slot
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor").field("slot", &self.slot).finish()
    }
}
