use girder_domain::config::ResourceConfig;
use girder_graph::{Binder, Injector};
use girder_kernel::server::dispatch::GraphDispatcher;
use girder_kernel::{Environment, EnvironmentError, HealthProbe, ProbeStatus};
use std::sync::Arc;

struct AlwaysUp;

impl HealthProbe for AlwaysUp {
    fn name(&self) -> &str {
        "always-up"
    }

    fn check(&self) -> ProbeStatus {
        ProbeStatus::Healthy
    }
}

fn empty_graph() -> Injector {
    Injector::builder().module(|_: &mut Binder| {}).build().expect("empty graph")
}

#[test]
fn adapter_installs_exactly_once() {
    let environment = Environment::new();
    assert!(environment.adapter().is_none());

    let graph = empty_graph();
    environment
        .install_adapter(GraphDispatcher::new(environment.clone(), graph.clone()))
        .expect("first install");
    assert!(environment.adapter().is_some());

    let second = environment.install_adapter(GraphDispatcher::new(environment.clone(), graph));
    assert!(matches!(second, Err(EnvironmentError::AdapterAlreadyInstalled)));
    // The original adapter stays in place.
    assert!(environment.adapter().is_some());
}

#[test]
fn probes_are_reported_in_registration_order() {
    let environment = Environment::new();
    assert!(environment.health_probes().is_empty());

    environment.register_health_probe(Arc::new(AlwaysUp));
    environment.register_health_probe(Arc::new(AlwaysUp));

    let probes = environment.health_probes();
    assert_eq!(probes.len(), 2);
    assert!(probes.iter().all(|p| p.check().is_healthy()));
}

#[test]
fn resource_config_is_replaceable() {
    let environment = Environment::new();
    assert!(environment.resource_config().is_empty());

    environment.set_resource_config(ResourceConfig::default().with_route("/status", "status"));
    assert_eq!(environment.resource_config().route("/status"), Some("status"));

    environment.set_resource_config(ResourceConfig::default());
    assert!(environment.resource_config().is_empty());
}

#[test]
fn dispatcher_returns_not_found_for_unmapped_paths() {
    let environment = Environment::new();
    let dispatcher = GraphDispatcher::new(environment.clone(), empty_graph());

    let response = dispatcher.dispatch("/nowhere");
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[test]
fn dispatcher_reports_unbound_resources() {
    let environment = Environment::new();
    environment.set_resource_config(ResourceConfig::default().with_route("/ghost", "ghost"));
    let dispatcher = GraphDispatcher::new(environment.clone(), empty_graph());

    let response = dispatcher.dispatch("/ghost");
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}
