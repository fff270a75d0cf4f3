//! Facade crate for `Girder` composition.
//! A [`Bundle`] merges independently-authored modules, specializes the
//! configuration-aware ones against the runtime configuration, builds the
//! dependency graph under one of three construction policies, installs the
//! request-pipeline adapter into the host [`Environment`], and harvests
//! health-probe contributions from the graph.
//!
//! ## Usage
//! ```rust
//! use girder::{Binder, Bundle, Environment};
//!
//! #[derive(Clone)]
//! struct Config {
//!     greeting: String,
//! }
//!
//! let environment = Environment::new();
//! let graph = Bundle::builder()
//!     .with_module(|b: &mut Binder| b.bind(7u32))
//!     .build()
//!     .run(Config { greeting: "hi".into() }, &environment)
//!     .unwrap();
//!
//! assert_eq!(*graph.get::<u32>().unwrap(), 7);
//! assert_eq!(graph.get::<Config>().unwrap().greeting, "hi");
//! ```

mod bundle;
mod harvest;
mod module;

pub use bundle::{Bundle, BundleBuilder, BundleError, GraphPolicy};
pub use harvest::harvest;
pub use module::{ConfiguredModule, ModuleError};

pub use girder_domain as domain;
pub use girder_graph as graph;
pub use girder_kernel as kernel;

pub use girder_graph::{Binder, GraphError, Injector, Key, Module, Stage};
pub use girder_kernel::{Environment, EnvironmentError, GraphDispatcher, HealthProbe, Resource};
