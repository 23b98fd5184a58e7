use thiserror::Error;

/// An accessor was called with no matching provider above it in the tree.
///
/// Raised even when the context was created with a default value: leaving
/// out the provider is a wiring mistake, not a fallback case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{context}` accessor must be used within its Provider")]
pub struct MissingProviderError {
    /// Label of the context that was read.
    pub context: String,
}

impl MissingProviderError {
    pub(crate) fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }
}
