use crate::harvest::harvest;
use crate::module::{ConfiguredModule, ModuleEntry, ModuleError, resolve_entries};
use girder_graph::{Binder, GraphError, Injector, Module, Stage};
use girder_kernel::{Environment, EnvironmentError, GraphDispatcher};
use std::fmt;
use tracing::{info, instrument};

/// Errors raised while configuring or running a bundle.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// An explicit parent graph and an explicit stage were both requested.
    #[error("a parent graph and an explicit stage are mutually exclusive")]
    PolicyConflict,

    /// `run_unconfigured` was called on a bundle holding configuration-aware
    /// modules.
    #[error("bundle holds configuration-aware modules; run it with a configuration")]
    ConfiguredModulesRequireConfig,

    #[error(transparent)]
    Module(#[from] ModuleError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

/// How the graph's root is established.
#[derive(Default, Debug, Clone)]
pub enum GraphPolicy {
    /// Fresh root graph with default settings.
    #[default]
    Default,
    /// Fresh root graph under an explicit verification stage.
    Staged(Stage),
    /// Child graph extending an existing parent.
    Parented(Injector),
}

/// Fluent configuration for a [`Bundle`].
///
/// Module registrations are additive and order-preserving; the construction
/// policy is exclusive: an explicit stage and a parent graph cannot both be
/// set, and the conflict is reported by the offending setter, well before
/// [`build`](Self::build).
#[must_use = "builders do nothing unless you call .build()"]
pub struct BundleBuilder<C> {
    entries: Vec<ModuleEntry<C>>,
    policy: GraphPolicy,
}

impl<C> Default for BundleBuilder<C> {
    fn default() -> Self {
        Self { entries: Vec::new(), policy: GraphPolicy::default() }
    }
}

impl<C: Clone + Send + Sync + 'static> BundleBuilder<C> {
    /// Registers one plain module.
    pub fn with_module<M: Module + 'static>(mut self, module: M) -> Self {
        self.entries.push(ModuleEntry::Plain(Box::new(module)));
        self
    }

    /// Registers already-boxed plain modules, preserving their order.
    pub fn with_modules<I>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Module>>,
    {
        self.entries.extend(modules.into_iter().map(ModuleEntry::Plain));
        self
    }

    /// Registers a configuration-aware module; it is specialized against the
    /// configuration passed to [`Bundle::run`] before being bound.
    pub fn with_configured_module<M: ConfiguredModule<C> + 'static>(mut self, module: M) -> Self {
        self.entries.push(ModuleEntry::Configured(Box::new(module)));
        self
    }

    /// Requests a fresh root graph under an explicit stage.
    ///
    /// # Errors
    /// [`BundleError::PolicyConflict`] when a parent graph is already set.
    pub fn with_stage(mut self, stage: Stage) -> Result<Self, BundleError> {
        if matches!(self.policy, GraphPolicy::Parented(_)) {
            return Err(BundleError::PolicyConflict);
        }
        self.policy = GraphPolicy::Staged(stage);
        Ok(self)
    }

    /// Makes the bundle's graph a child of `parent`.
    ///
    /// # Errors
    /// [`BundleError::PolicyConflict`] when an explicit stage is already set.
    pub fn with_parent(mut self, parent: Injector) -> Result<Self, BundleError> {
        if matches!(self.policy, GraphPolicy::Staged(_)) {
            return Err(BundleError::PolicyConflict);
        }
        self.policy = GraphPolicy::Parented(parent);
        Ok(self)
    }

    /// Consumes the builder and produces the bundle.
    pub fn build(self) -> Bundle<C> {
        Bundle { entries: self.entries, policy: self.policy }
    }
}

impl<C> fmt::Debug for BundleBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleBuilder")
            .field("modules", &self.entries.len())
            .field("policy", &self.policy)
            .finish()
    }
}

/// The composition entry point, invoked once per host-application startup.
pub struct Bundle<C> {
    entries: Vec<ModuleEntry<C>>,
    policy: GraphPolicy,
}

impl<C: Clone + Send + Sync + 'static> Bundle<C> {
    #[must_use]
    pub fn builder() -> BundleBuilder<C> {
        BundleBuilder::default()
    }

    /// First phase of the host lifecycle. Nothing to do here; all wiring
    /// needs the runtime configuration and happens in [`run`](Self::run).
    pub const fn initialize(&self) {}

    /// Resolves the module set against `configuration`, builds the graph
    /// under the selected policy, installs the request-pipeline adapter into
    /// `environment`, and harvests health-probe contributions.
    ///
    /// The built graph is returned so the host can query it; it stays alive
    /// for the process regardless, referenced by the installed adapter.
    ///
    /// # Errors
    /// Any resolution, build, or installation failure aborts startup with
    /// nothing partially installed beyond what the error names.
    #[instrument(skip_all, name = "bundle_run")]
    pub fn run(self, configuration: C, environment: &Environment) -> Result<Injector, BundleError> {
        let Self { entries, policy } = self;
        let resolved = resolve_entries(entries, &configuration)?;
        finish(policy, Some(configuration), resolved, environment)
    }

    /// The no-configuration variant of [`run`](Self::run): every registered
    /// module must be plain, and no configuration value is bound.
    ///
    /// # Errors
    /// [`BundleError::ConfiguredModulesRequireConfig`] when any
    /// configuration-aware module was registered.
    #[instrument(skip_all, name = "bundle_run")]
    pub fn run_unconfigured(self, environment: &Environment) -> Result<Injector, BundleError> {
        let Self { entries, policy } = self;
        if entries.iter().any(ModuleEntry::is_configured) {
            return Err(BundleError::ConfiguredModulesRequireConfig);
        }
        let resolved = entries
            .into_iter()
            .map(|entry| match entry {
                ModuleEntry::Plain(module) => module,
                ModuleEntry::Configured(_) => unreachable!("checked above"),
            })
            .collect();
        finish::<C>(policy, None, resolved, environment)
    }
}

impl<C> fmt::Debug for Bundle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("modules", &self.entries.len())
            .field("policy", &self.policy)
            .finish()
    }
}

/// The implicit module every bundle prepends: the configuration value (when
/// present) under its own type, the environment handle, and the dispatcher
/// as an eager singleton so it exists the moment the graph does.
struct EnvironmentModule<C> {
    configuration: Option<C>,
    environment: Environment,
}

impl<C: Clone + Send + Sync + 'static> Module for EnvironmentModule<C> {
    fn configure(&self, binder: &mut Binder) {
        if let Some(configuration) = &self.configuration {
            binder.bind(configuration.clone());
        }
        binder.bind(self.environment.clone());

        let environment = self.environment.clone();
        binder.bind_eager_factory(move |injector| {
            Ok(GraphDispatcher::new(environment.clone(), injector.clone()))
        });
    }
}

fn finish<C: Clone + Send + Sync + 'static>(
    policy: GraphPolicy,
    configuration: Option<C>,
    modules: Vec<Box<dyn Module>>,
    environment: &Environment,
) -> Result<Injector, BundleError> {
    let implicit = EnvironmentModule { configuration, environment: environment.clone() };

    let mut builder = Injector::builder().module(implicit).modules(modules);
    builder = match policy {
        GraphPolicy::Default => builder,
        GraphPolicy::Staged(stage) => builder.stage(stage),
        GraphPolicy::Parented(parent) => builder.parent(parent),
    };
    let graph = builder.build()?;

    let dispatcher = graph.get::<GraphDispatcher>()?;
    environment.install_adapter(GraphDispatcher::clone(&dispatcher))?;
    info!("dependency graph wired into the request pipeline");

    harvest(&graph, environment)?;
    Ok(graph)
}
