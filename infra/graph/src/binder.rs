use crate::error::GraphError;
use crate::injector::Injector;
use crate::key::Key;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Type-erased singleton value shared across the graph.
pub(crate) type Shared = Arc<dyn Any + Send + Sync>;

/// Type-erased provider invoked at most once per graph.
pub(crate) type Factory = Box<dyn Fn(&Injector) -> Result<Shared, GraphError> + Send + Sync>;

/// An opaque unit of binding instructions.
///
/// Modules are merged in insertion order by [`GraphBuilder`](crate::GraphBuilder);
/// `configure` itself cannot fail, failures belong to providers (resolved
/// lazily or at build time under [`Stage::Production`](crate::Stage)).
pub trait Module: Send + Sync {
    fn configure(&self, binder: &mut Binder);
}

/// Closures over a [`Binder`] act as modules, which keeps small binding
/// units and tests free of one-off struct definitions.
impl<F> Module for F
where
    F: Fn(&mut Binder) + Send + Sync,
{
    fn configure(&self, binder: &mut Binder) {
        self(binder);
    }
}

pub(crate) enum Provider {
    Instance(Shared),
    Factory(Factory),
}

pub(crate) struct Binding {
    pub(crate) key: Key,
    pub(crate) provider: Provider,
    pub(crate) eager: bool,
}

pub(crate) struct SetContribution {
    pub(crate) element_type: TypeId,
    pub(crate) element_name: &'static str,
    pub(crate) provider: Factory,
}

/// Collects bindings while modules are being configured.
///
/// The binder records insertion order and performs no conflict checks of its
/// own; duplicate keys are rejected when the graph is assembled.
#[derive(Default)]
pub struct Binder {
    pub(crate) bindings: Vec<Binding>,
    pub(crate) contributions: Vec<SetContribution>,
}

impl Binder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Binds `value` as the singleton instance for `T`.
    pub fn bind<T: Send + Sync + 'static>(&mut self, value: T) {
        self.push_instance(Key::of::<T>(), value);
    }

    /// Binds `value` as the singleton instance for `T` under `name`.
    pub fn bind_named<T: Send + Sync + 'static>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: T,
    ) {
        self.push_instance(Key::named::<T>(name), value);
    }

    /// Binds a lazily-invoked provider for `T`; the provider may look up
    /// other bindings through the injector handle it receives.
    pub fn bind_factory<T, F>(&mut self, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Injector) -> Result<T, GraphError> + Send + Sync + 'static,
    {
        self.push_factory(Key::of::<T>(), factory, false);
    }

    /// Named-binding variant of [`bind_factory`](Self::bind_factory).
    pub fn bind_named_factory<T, F>(&mut self, name: impl Into<Cow<'static, str>>, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Injector) -> Result<T, GraphError> + Send + Sync + 'static,
    {
        self.push_factory(Key::named::<T>(name), factory, false);
    }

    /// Binds a provider for `T` that is instantiated during graph build,
    /// regardless of stage.
    pub fn bind_eager_factory<T, F>(&mut self, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Injector) -> Result<T, GraphError> + Send + Sync + 'static,
    {
        self.push_factory(Key::of::<T>(), factory, true);
    }

    /// Contributes one element to the set bound under element type `T`.
    ///
    /// The first contribution creates the set; a set nobody contributed to
    /// stays absent rather than empty.
    pub fn add_to_set<T: Clone + Send + Sync + 'static>(&mut self, value: T) {
        self.add_to_set_factory(move |_| Ok(value.clone()));
    }

    /// Factory variant of [`add_to_set`](Self::add_to_set) for elements that
    /// depend on other bindings.
    pub fn add_to_set_factory<T, F>(&mut self, factory: F)
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&Injector) -> Result<T, GraphError> + Send + Sync + 'static,
    {
        self.contributions.push(SetContribution {
            element_type: TypeId::of::<T>(),
            element_name: std::any::type_name::<T>(),
            provider: Box::new(move |injector| Ok(Arc::new(factory(injector)?) as Shared)),
        });
    }

    fn push_instance<T: Send + Sync + 'static>(&mut self, key: Key, value: T) {
        self.bindings.push(Binding {
            key,
            provider: Provider::Instance(Arc::new(value)),
            eager: false,
        });
    }

    fn push_factory<T, F>(&mut self, key: Key, factory: F, eager: bool)
    where
        T: Send + Sync + 'static,
        F: Fn(&Injector) -> Result<T, GraphError> + Send + Sync + 'static,
    {
        self.bindings.push(Binding {
            key,
            provider: Provider::Factory(Box::new(move |injector| {
                Ok(Arc::new(factory(injector)?) as Shared)
            })),
            eager,
        });
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("bindings", &self.bindings.len())
            .field("contributions", &self.contributions.len())
            .finish()
    }
}
