use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Top-level application configuration shared across subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub server: ServerConfig,
    pub resources: ResourceConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
}

/// Routing table consumed by the request-pipeline adapter: request path to
/// the name of a resource binding in the dependency graph.
///
/// The table is replaceable on the `Environment` at runtime; the adapter
/// reads it per request, never at construction.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    routes: BTreeMap<String, String>,
}

impl ResourceConfig {
    /// Maps `path` to the resource binding `name`, replacing any prior mapping.
    pub fn insert(&mut self, path: impl Into<String>, name: impl Into<String>) {
        self.routes.insert(path.into(), name.into());
    }

    /// Builder-style variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with_route(mut self, path: impl Into<String>, name: impl Into<String>) -> Self {
        self.insert(path, name);
        self
    }

    /// Returns the binding name registered for `path`, if any.
    #[must_use]
    pub fn route(&self, path: &str) -> Option<&str> {
        self.routes.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates mappings in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(p, n)| (p.as_str(), n.as_str()))
    }
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 4690 }
    }
}
