use axum::response::Response;

/// A request-addressable resource resolved from the dependency graph.
///
/// Resources are bound as `Arc<dyn Resource>` under the name the resource
/// routing table points at; the dispatcher resolves and invokes them per
/// request.
pub trait Resource: Send + Sync {
    fn get(&self) -> Response;
}
