use crate::binder::{Factory, Provider, Shared};
use crate::builder::{GraphBuilder, Stage};
use crate::error::GraphError;
use crate::key::Key;
use fxhash::FxHashMap;
use std::any::TypeId;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, OnceLock};

thread_local! {
    /// Keys currently being resolved on this thread, for cycle detection
    /// across nested provider lookups.
    static RESOLVING: RefCell<Vec<Key>> = const { RefCell::new(Vec::new()) };
}

pub(crate) struct Slot {
    pub(crate) provider: Provider,
    pub(crate) eager: bool,
    pub(crate) cell: OnceLock<Shared>,
}

pub(crate) struct SetSlot {
    pub(crate) element_name: &'static str,
    pub(crate) providers: Vec<Factory>,
    pub(crate) cell: OnceLock<Vec<Shared>>,
}

struct InjectorInner {
    parent: Option<Injector>,
    stage: Stage,
    slots: FxHashMap<Key, Slot>,
    sets: FxHashMap<TypeId, SetSlot>,
}

/// An immutable, thread-shared dependency graph.
///
/// `Injector` is a cheap-clone handle over the actual graph; clones observe
/// the same singleton instances. No bindings can be added after build.
#[derive(Clone)]
pub struct Injector {
    inner: Arc<InjectorInner>,
}

impl Injector {
    /// Returns a builder for a new graph.
    #[must_use]
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    pub(crate) fn from_parts(
        parent: Option<Injector>,
        stage: Stage,
        slots: FxHashMap<Key, Slot>,
        sets: FxHashMap<TypeId, SetSlot>,
    ) -> Self {
        Self { inner: Arc::new(InjectorInner { parent, stage, slots, sets }) }
    }

    /// Stage the graph was built under.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.inner.stage
    }

    /// Resolves the singleton bound for `T`.
    ///
    /// # Errors
    /// [`GraphError::MissingBinding`] when neither this graph nor a parent
    /// binds `T`; provider failures propagate unchanged.
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, GraphError> {
        self.get_by_key(&Key::of::<T>())
    }

    /// Resolves the singleton bound for `T` under `name`.
    ///
    /// # Errors
    /// Same failure modes as [`get`](Self::get).
    pub fn get_named<T: Send + Sync + 'static>(
        &self,
        name: impl Into<Cow<'static, str>>,
    ) -> Result<Arc<T>, GraphError> {
        self.get_by_key(&Key::named::<T>(name))
    }

    /// Whether a binding for `key` exists in this graph or any parent.
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.inner.slots.contains_key(key)
            || self.inner.parent.as_ref().is_some_and(|p| p.contains(key))
    }

    /// Resolves the set bound under element type `T`.
    ///
    /// Returns `Ok(None)` when no module ever contributed an element of `T`;
    /// lookup falls back to the parent when this graph has no such set.
    ///
    /// # Errors
    /// Contribution provider failures propagate unchanged.
    pub fn get_set<T: Clone + Send + Sync + 'static>(&self) -> Result<Option<Vec<T>>, GraphError> {
        let Some(set) = self.inner.sets.get(&TypeId::of::<T>()) else {
            return match &self.inner.parent {
                Some(parent) => parent.get_set::<T>(),
                None => Ok(None),
            };
        };

        let elements = match set.cell.get() {
            Some(cached) => cached.clone(),
            None => {
                let mut resolved = Vec::with_capacity(set.providers.len());
                for provider in &set.providers {
                    resolved.push(provider(self)?);
                }
                tracing::trace!(set = set.element_name, elements = resolved.len(), "set resolved");
                set.cell.get_or_init(|| resolved).clone()
            }
        };

        let mut out = Vec::with_capacity(elements.len());
        for element in elements {
            let element = element.downcast::<T>().map_err(|_| GraphError::TypeMismatch {
                key: Key::of::<T>(),
            })?;
            out.push(T::clone(&element));
        }
        Ok(Some(out))
    }

    fn get_by_key<T: Send + Sync + 'static>(&self, key: &Key) -> Result<Arc<T>, GraphError> {
        self.resolve(key)?
            .downcast::<T>()
            .map_err(|_| GraphError::TypeMismatch { key: key.clone() })
    }

    pub(crate) fn resolve(&self, key: &Key) -> Result<Shared, GraphError> {
        if let Some(slot) = self.inner.slots.get(key) {
            return self.resolve_slot(key, slot);
        }
        match &self.inner.parent {
            Some(parent) => parent.resolve(key),
            None => Err(GraphError::MissingBinding { key: key.clone() }),
        }
    }

    fn resolve_slot(&self, key: &Key, slot: &Slot) -> Result<Shared, GraphError> {
        if let Some(value) = slot.cell.get() {
            return Ok(value.clone());
        }

        let value = match &slot.provider {
            Provider::Instance(value) => value.clone(),
            Provider::Factory(factory) => {
                if RESOLVING.with_borrow(|stack| stack.contains(key)) {
                    return Err(GraphError::CircularDependency { key: key.clone() });
                }
                RESOLVING.with_borrow_mut(|stack| stack.push(key.clone()));
                let produced = factory(self);
                RESOLVING.with_borrow_mut(|stack| {
                    stack.pop();
                });
                produced?
            }
        };

        // A concurrent resolver may have won the race; the cached value is
        // the only instance ever handed out.
        Ok(slot.cell.get_or_init(|| value).clone())
    }

    /// Resolves every singleton and set in this graph (not parents).
    pub(crate) fn resolve_all(&self) -> Result<(), GraphError> {
        for (key, slot) in &self.inner.slots {
            self.resolve_slot(key, slot)?;
        }
        for set in self.inner.sets.values() {
            if set.cell.get().is_some() {
                continue;
            }
            let mut resolved = Vec::with_capacity(set.providers.len());
            for provider in &set.providers {
                resolved.push(provider(self)?);
            }
            let _ = set.cell.set(resolved);
        }
        Ok(())
    }

    /// Resolves the bindings marked eager by their modules.
    pub(crate) fn resolve_eager(&self) -> Result<(), GraphError> {
        for (key, slot) in &self.inner.slots {
            if slot.eager {
                self.resolve_slot(key, slot)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("stage", &self.inner.stage)
            .field("bindings", &self.inner.slots.len())
            .field("sets", &self.inner.sets.len())
            .field("parented", &self.inner.parent.is_some())
            .finish()
    }
}
