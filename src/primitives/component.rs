//! Component Primitive - A plain node in the tree.
//!
//! Groups children under one index. It publishes nothing itself; it exists
//! so consumers sit at a real position in the tree, the way a box does in a
//! layout.
//!
//! # Pattern: EffectScope per node
//!
//! Every node renders inside its own EffectScope:
//! 1. Allocate the index under the current parent
//! 2. Register `scope.stop()` as a destroy callback of the node
//! 3. Run rendering logic inside `scope.run()` with the node as parent
//!
//! Effects created while rendering (including `on_scope_dispose` teardown)
//! therefore end when the node is released, whether directly, because an
//! ancestor was released, or because the render itself panicked.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{effect_scope, on_scope_dispose};
use tracing::{debug, trace};

use super::types::{Cleanup, ComponentProps};
use crate::engine::{allocate_node, on_destroy, with_parent_context, NodeRef};

/// A node's effect scope. Taken out and stopped by the node's destroy
/// callback.
struct NodeScope<S>(RefCell<Option<S>>);

impl<S> Drop for NodeScope<S> {
    fn drop(&mut self) {
        // Only reached when the registry's thread-locals are torn down with
        // nodes still mounted. The reactive runtime may already be gone.
        if let Some(scope) = self.0.get_mut().take() {
            std::mem::forget(scope);
        }
    }
}

/// Releases the node if its render unwinds.
struct ReleaseOnUnwind(NodeRef);

impl Drop for ReleaseOnUnwind {
    fn drop(&mut self) {
        if std::thread::panicking() {
            debug!(index = self.0.index(), "render panicked, releasing node");
            self.0.release();
        }
    }
}

/// Allocate a node under the current parent and render it.
///
/// `render` receives the new index and runs with that index as the current
/// parent, inside an effect scope that stops when the node is destroyed.
pub(crate) fn render_node(id: Option<&str>, render: impl FnOnce(usize) + 'static) -> NodeRef {
    let node = allocate_node(id);
    let index = node.index();

    let scope = Rc::new(NodeScope(RefCell::new(Some(effect_scope(false)))));
    let scope_for_destroy = scope.clone();
    on_destroy(index, move || {
        let stopped = scope_for_destroy.0.borrow_mut().take();
        if let Some(stopped) = stopped {
            stopped.stop();
        }
    });

    let _release = ReleaseOnUnwind(node);
    with_parent_context(index, || {
        if let Some(scope) = scope.0.borrow().as_ref() {
            scope.run(move || render(index));
        }
    });

    node
}

/// Run `cleanup` when the current effect scope is disposed.
///
/// Inside a provider's value function or a component's children this is
/// when the node unmounts. Takes a one-shot closure, such as the
/// unsubscribe function returned by [`crate::keyboard::on`].
pub fn on_cleanup(cleanup: impl FnOnce() + 'static) {
    let cleanup = RefCell::new(Some(cleanup));
    on_scope_dispose(move || {
        if let Some(cleanup) = cleanup.take() {
            cleanup();
        }
    });
}

/// Create a grouping component under the current parent.
///
/// Children render synchronously with the new node as their parent.
/// Returns a cleanup function that releases the node and its subtree.
pub fn component(props: ComponentProps) -> Cleanup {
    let children = props.children;
    let node = render_node(props.id.as_deref(), move |_| {
        if let Some(children) = children {
            children();
        }
    });
    trace!(index = node.index(), "component created");

    Box::new(move || {
        node.release();
    })
}
