use crate::key::Key;
use std::borrow::Cow;

/// Errors raised by graph construction and lookup.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Two modules bound the same key within one build.
    #[error("duplicate binding for {key}")]
    DuplicateBinding { key: Key },

    /// No binding exists for the requested key, in this graph or any parent.
    #[error("no binding for {key}")]
    MissingBinding { key: Key },

    /// A binding exists but holds a value of a different type than requested.
    #[error("binding for {key} holds a different type than requested")]
    TypeMismatch { key: Key },

    /// A provider re-entered its own resolution on the same thread.
    #[error("circular dependency while resolving {key}")]
    CircularDependency { key: Key },

    /// A provider failed while constructing its value.
    #[error("provider for {key} failed: {message}")]
    Provider { key: Key, message: Cow<'static, str> },
}

impl GraphError {
    /// Convenience constructor for provider failures.
    pub fn provider(key: Key, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Provider { key, message: message.into() }
    }
}
