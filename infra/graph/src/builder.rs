use crate::binder::{Binder, Module};
use crate::error::GraphError;
use crate::injector::{Injector, SetSlot, Slot};
use fxhash::FxHashMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// How strictly a graph is verified while being built.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Singletons are constructed on first lookup.
    #[default]
    Development,
    /// Every singleton and set is constructed during build, so provider
    /// failures surface before the graph is handed out.
    Production,
}

/// Assembles an [`Injector`] from an ordered module list.
///
/// Modules are configured in insertion order; a duplicate key across the
/// list fails the build. An optional parent graph stays visible through the
/// child for any key the child does not bind itself.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Default)]
pub struct GraphBuilder {
    modules: Vec<Box<dyn Module>>,
    stage: Stage,
    parent: Option<Injector>,
}

impl GraphBuilder {
    /// Appends one module.
    pub fn module<M: Module + 'static>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Appends already-boxed modules, preserving their order.
    pub fn modules<I>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Module>>,
    {
        self.modules.extend(modules);
        self
    }

    /// Sets the verification stage.
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    /// Makes the new graph a child of `parent`.
    pub fn parent(mut self, parent: Injector) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Consumes the builder and constructs the graph.
    ///
    /// # Errors
    /// [`GraphError::DuplicateBinding`] when two modules bind the same key;
    /// under [`Stage::Production`], or for bindings marked eager, provider
    /// failures surface here instead of at first lookup.
    pub fn build(self) -> Result<Injector, GraphError> {
        let mut binder = Binder::new();
        for module in &self.modules {
            module.configure(&mut binder);
        }

        let mut slots: FxHashMap<_, _> = FxHashMap::default();
        for binding in binder.bindings {
            if slots.contains_key(&binding.key) {
                return Err(GraphError::DuplicateBinding { key: binding.key });
            }
            slots.insert(
                binding.key,
                Slot { provider: binding.provider, eager: binding.eager, cell: OnceLock::new() },
            );
        }

        let mut sets: FxHashMap<_, SetSlot> = FxHashMap::default();
        for contribution in binder.contributions {
            sets.entry(contribution.element_type)
                .or_insert_with(|| SetSlot {
                    element_name: contribution.element_name,
                    providers: Vec::new(),
                    cell: OnceLock::new(),
                })
                .providers
                .push(contribution.provider);
        }

        debug!(
            modules = self.modules.len(),
            bindings = slots.len(),
            sets = sets.len(),
            stage = ?self.stage,
            parented = self.parent.is_some(),
            "assembling dependency graph"
        );

        let injector = Injector::from_parts(self.parent, self.stage, slots, sets);

        match self.stage {
            Stage::Production => injector.resolve_all()?,
            Stage::Development => injector.resolve_eager()?,
        }

        Ok(injector)
    }
}

impl fmt::Debug for GraphBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphBuilder")
            .field("modules", &self.modules.len())
            .field("stage", &self.stage)
            .field("parented", &self.parent.is_some())
            .finish()
    }
}
