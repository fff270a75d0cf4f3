//! # Dependency Graph
//!
//! A compact typed object graph: modules contribute bindings through a
//! [`Binder`], and [`GraphBuilder`] turns an ordered module list into an
//! immutable, thread-shared [`Injector`].
//!
//! * Bindings are singletons, keyed by type (optionally plus a name).
//! * A graph may extend a parent graph; child bindings shadow the parent
//!   for lookups through the child, parent instances are shared.
//! * Set bindings collect independent contributions of one element type;
//!   a set nobody contributed to is absent, not empty.
//! * [`Stage::Production`] resolves every singleton at build time so
//!   provider failures surface before the graph is handed out.
//!
//! ## Example
//!
//! ```rust
//! use girder_graph::{Binder, Injector};
//!
//! let graph = Injector::builder()
//!     .module(|binder: &mut Binder| binder.bind(42u32))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(*graph.get::<u32>().unwrap(), 42);
//! ```

mod binder;
mod builder;
mod error;
mod injector;
mod key;

pub use binder::{Binder, Module};
pub use builder::{GraphBuilder, Stage};
pub use error::GraphError;
pub use injector::Injector;
pub use key::Key;
