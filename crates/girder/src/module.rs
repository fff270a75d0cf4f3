use girder_graph::Module;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// Errors raised while a configuration-aware module derives its bindings.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// The configuration section the module depends on is malformed.
    #[error("invalid module configuration: {0}")]
    Config(Cow<'static, str>),

    /// Anything else a module author needs to surface.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModuleError {
    /// Convenience constructor for configuration failures.
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(message.into())
    }
}

/// A module that must be specialized with the runtime configuration before
/// it can be bound into a graph.
///
/// The capability is declared at registration
/// ([`with_configured_module`](crate::BundleBuilder::with_configured_module)),
/// and the config type parameter ties the module to its bundle, so a module
/// expecting a different configuration shape is a compile error.
pub trait ConfiguredModule<C>: Send + Sync {
    /// Derives the module to bind in this module's place. Returning a fresh
    /// module or a configured copy of `self` are both fine; a failure aborts
    /// startup before anything is installed.
    fn with_configuration(&self, configuration: &C) -> Result<Box<dyn Module>, ModuleError>;
}

impl<C, F> ConfiguredModule<C> for F
where
    F: Fn(&C) -> Result<Box<dyn Module>, ModuleError> + Send + Sync,
{
    fn with_configuration(&self, configuration: &C) -> Result<Box<dyn Module>, ModuleError> {
        self(configuration)
    }
}

/// One registered module, tagged with its capability.
pub(crate) enum ModuleEntry<C> {
    Plain(Box<dyn Module>),
    Configured(Box<dyn ConfiguredModule<C>>),
}

impl<C> ModuleEntry<C> {
    pub(crate) const fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }
}

impl<C> fmt::Debug for ModuleEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Plain"),
            Self::Configured(_) => f.write_str("Configured"),
        }
    }
}

/// Resolves an ordered entry list against the configuration: plain modules
/// pass through unchanged, configuration-aware modules are substituted by
/// their `with_configuration` result, each invoked exactly once, in place.
pub(crate) fn resolve_entries<C>(
    entries: Vec<ModuleEntry<C>>,
    configuration: &C,
) -> Result<Vec<Box<dyn Module>>, ModuleError> {
    let mut resolved = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            ModuleEntry::Plain(module) => resolved.push(module),
            ModuleEntry::Configured(module) => {
                resolved.push(module.with_configuration(configuration)?);
            }
        }
    }
    debug!(modules = resolved.len(), "module set resolved");
    Ok(resolved)
}
