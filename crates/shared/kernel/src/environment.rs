use crate::probe::HealthProbe;
use crate::server::dispatch::GraphDispatcher;
use girder_domain::config::ResourceConfig;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Errors raised by the host environment.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    /// The request-pipeline adapter accepts exactly one installation per
    /// environment; a second install is a caller bug.
    #[error("a request-pipeline adapter is already installed")]
    AdapterAlreadyInstalled,
}

#[derive(Default)]
struct EnvironmentInner {
    adapter: OnceLock<GraphDispatcher>,
    probes: RwLock<Vec<Arc<dyn HealthProbe>>>,
    resources: RwLock<ResourceConfig>,
}

/// The host application's process-wide runtime services.
///
/// `Environment` is a cheap-clone handle; clones observe the same adapter,
/// probe registry, and resource configuration. It is written during the
/// single-threaded startup window and read by request-handling threads
/// afterwards; the resource configuration alone stays replaceable at runtime.
#[derive(Default, Clone)]
pub struct Environment {
    inner: Arc<EnvironmentInner>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the request-pipeline adapter.
    ///
    /// # Errors
    /// [`EnvironmentError::AdapterAlreadyInstalled`] on any call after the
    /// first; the original adapter stays in place.
    pub fn install_adapter(&self, adapter: GraphDispatcher) -> Result<(), EnvironmentError> {
        self.inner
            .adapter
            .set(adapter)
            .map_err(|_| EnvironmentError::AdapterAlreadyInstalled)?;
        debug!("request-pipeline adapter installed");
        Ok(())
    }

    /// The installed adapter, if startup has reached installation.
    #[must_use]
    pub fn adapter(&self) -> Option<GraphDispatcher> {
        self.inner.adapter.get().cloned()
    }

    /// Registers one health probe; probes are reported by the system
    /// health endpoint in registration order.
    pub fn register_health_probe(&self, probe: Arc<dyn HealthProbe>) {
        debug!(probe = probe.name(), "health probe registered");
        self.inner.probes.write().push(probe);
    }

    #[must_use]
    pub fn health_probes(&self) -> Vec<Arc<dyn HealthProbe>> {
        self.inner.probes.read().clone()
    }

    /// Replaces the resource routing table. Takes effect for the next
    /// dispatched request; the adapter never caches it.
    pub fn set_resource_config(&self, resources: ResourceConfig) {
        *self.inner.resources.write() = resources;
    }

    /// The current resource routing table.
    #[must_use]
    pub fn resource_config(&self) -> ResourceConfig {
        self.inner.resources.read().clone()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("adapter_installed", &self.inner.adapter.get().is_some())
            .field("probes", &self.inner.probes.read().len())
            .field("resources", &self.inner.resources.read().len())
            .finish()
    }
}
