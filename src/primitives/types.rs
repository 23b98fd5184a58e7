//! Primitive types - Props and cleanup.

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by components.
///
/// Call this to unmount the component and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

/// Child render function.
///
/// Runs once, with the owning component as the current parent.
pub type Children = Box<dyn FnOnce()>;

// =============================================================================
// Component Props
// =============================================================================

/// Properties for a plain grouping component.
///
/// # Example
///
/// ```ignore
/// use spark_context::primitives::{component, ComponentProps};
///
/// let cleanup = component(ComponentProps {
///     id: Some("sidebar".into()),
///     children: Some(Box::new(|| {
///         let theme = use_theme.use_value();
///         // ...
///     })),
/// });
/// ```
#[derive(Default)]
pub struct ComponentProps {
    /// Optional stable ID (generated when absent).
    pub id: Option<String>,

    /// Child render function.
    pub children: Option<Children>,
}

impl ComponentProps {
    /// Props with only a child render function.
    pub fn with_children(children: impl FnOnce() + 'static) -> Self {
        Self {
            id: None,
            children: Some(Box::new(children)),
        }
    }
}
