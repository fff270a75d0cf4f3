//! Kernel utilities shared across the platform.
//! Keep this crate lightweight; it owns the host [`Environment`], the health-probe
//! and resource contracts, and the request-pipeline adapter that delegates into
//! the dependency graph. Configuration loading lives in [`config`]: a file base
//! layered with `GIRDER__`-prefixed environment overrides.

pub mod config;
pub mod environment;
pub mod probe;
pub mod server;

pub use environment::{Environment, EnvironmentError};
pub use probe::{HealthProbe, ProbeStatus};
pub use server::dispatch::GraphDispatcher;
pub use server::resource::Resource;

pub use girder_domain as domain;
