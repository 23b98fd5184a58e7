//! Pipeline - Mounting an application tree.
//!
//! ```text
//! mount(app) → root node → providers/components → accessors read upward
//! ```

mod mount;

pub use mount::{mount, MountHandle};
