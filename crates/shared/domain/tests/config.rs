use girder_domain::config::{AppConfig, ResourceConfig, ServerConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4690);
    assert!(server.address.is_unspecified());

    let resources = ResourceConfig::default();
    assert!(resources.is_empty());
    assert!(resources.route("/anything").is_none());
}

#[test]
fn app_config_deserializes() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "resources": { "routes": { "/status": "status" } }
    });

    let cfg: AppConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.resources.route("/status"), Some("status"));
}

#[test]
fn resource_config_iterates_in_path_order() {
    let rc = ResourceConfig::default()
        .with_route("/b", "beta")
        .with_route("/a", "alpha")
        .with_route("/c", "gamma");

    let pairs: Vec<_> = rc.iter().collect();
    assert_eq!(pairs, [("/a", "alpha"), ("/b", "beta"), ("/c", "gamma")]);
}

#[test]
fn resource_config_last_write_wins() {
    let rc = ResourceConfig::default()
        .with_route("/status", "status")
        .with_route("/status", "status-v2");

    assert_eq!(rc.len(), 1);
    assert_eq!(rc.route("/status"), Some("status-v2"));
}
