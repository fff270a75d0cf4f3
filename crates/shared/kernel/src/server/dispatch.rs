use crate::environment::Environment;
use crate::server::resource::Resource;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use girder_graph::Injector;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// The request-pipeline adapter: bridges the host's request path into the
/// dependency graph.
///
/// Created as an eager singleton while the graph is built; the resource
/// routing table is read from the [`Environment`] on every dispatch, so
/// changes made after the graph was built are visible immediately.
#[derive(Clone)]
pub struct GraphDispatcher {
    environment: Environment,
    graph: Injector,
}

impl GraphDispatcher {
    #[must_use]
    pub const fn new(environment: Environment, graph: Injector) -> Self {
        Self { environment, graph }
    }

    /// Routes `path` through the current resource configuration and invokes
    /// the matching resource binding.
    pub fn dispatch(&self, path: &str) -> Response {
        let resources = self.environment.resource_config();
        let Some(name) = resources.route(path) else {
            return (StatusCode::NOT_FOUND, format!("no resource mapped for {path}"))
                .into_response();
        };

        match self.graph.get_named::<Arc<dyn Resource>>(name.to_owned()) {
            Ok(resource) => resource.get(),
            Err(err) => {
                warn!(path, resource = name, %err, "resource lookup failed");
                (StatusCode::NOT_FOUND, format!("resource {name} is not bound")).into_response()
            }
        }
    }
}

impl fmt::Debug for GraphDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphDispatcher").field("graph", &self.graph).finish_non_exhaustive()
    }
}

/// Axum fallback handler delegating every unmatched path to the installed
/// adapter; 503 until startup has installed one.
pub async fn dispatch_handler(State(environment): State<Environment>, uri: Uri) -> Response {
    match environment.adapter() {
        Some(adapter) => adapter.dispatch(uri.path()),
        None => {
            (StatusCode::SERVICE_UNAVAILABLE, "request adapter not installed").into_response()
        }
    }
}
