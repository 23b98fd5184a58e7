//! Mount - Application root.
//!
//! `mount()` creates the root node and renders the application inside it.
//! Everything the app creates (providers, components, their effects) hangs
//! off that root and is torn down by [`MountHandle::unmount`], or when the
//! handle is dropped.
//!
//! # Example
//!
//! ```ignore
//! use spark_context::{mount, create_context};
//!
//! let (theme_provider, use_theme) = create_context(|| "dark", None);
//!
//! let handle = mount(move || {
//!     theme_provider.render(move || {
//!         let theme = use_theme.use_value();
//!     });
//! });
//!
//! handle.unmount();
//! ```

use tracing::debug;

use crate::engine::NodeRef;
use crate::primitives::render_node;

/// Handle to a mounted application.
///
/// Dropping the handle unmounts the application.
#[derive(Debug)]
pub struct MountHandle {
    root: Option<NodeRef>,
}

impl MountHandle {
    /// Index of the root node.
    pub fn root(&self) -> Option<usize> {
        self.root.map(|root| root.index())
    }

    /// Release the whole tree.
    ///
    /// Runs teardown for every provider and component, children first.
    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(root) = self.root.take() {
            debug!(root = root.index(), "unmounting application");
            root.release();
        }
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// Mount an application.
///
/// `app` renders synchronously with the root node as its parent.
pub fn mount(app: impl FnOnce() + 'static) -> MountHandle {
    let root = render_node(None, move |_| app());
    debug!(root = root.index(), "application mounted");
    MountHandle { root: Some(root) }
}
