use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header, response::Parts};
use girder_kernel::server::router::system_router;
use girder_kernel::{Environment, HealthProbe, ProbeStatus};
use std::sync::Arc;
use tower::ServiceExt;
use utoipa_axum::router::OpenApiRouter;

struct FixedProbe {
    name: &'static str,
    status: ProbeStatus,
}

impl HealthProbe for FixedProbe {
    fn name(&self) -> &str {
        self.name
    }

    fn check(&self) -> ProbeStatus {
        self.status.clone()
    }
}

fn health_app(environment: Environment) -> Router {
    let (router, _api_doc) =
        OpenApiRouter::new().merge(system_router()).with_state(environment).split_for_parts();
    router
}

async fn fetch_health(environment: Environment) -> (Parts, serde_json::Value) {
    let response = health_app(environment)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.expect("body");
    let json = serde_json::from_slice(&bytes).expect("json body");
    (parts, json)
}

#[tokio::test]
async fn health_reports_up_with_probe_results() {
    let environment = Environment::new();
    environment
        .register_health_probe(Arc::new(FixedProbe { name: "store", status: ProbeStatus::Healthy }));

    let (parts, body) = fetch_health(environment).await;

    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(
        parts.headers.get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("no-store, no-cache, must-revalidate"),
    );
    assert_eq!(body["status"], "up");
    assert_eq!(body["probes"][0]["name"], "store");
    assert_eq!(body["probes"][0]["healthy"], true);
    // Healthy probes carry no failure message.
    assert!(body["probes"][0].get("message").is_none());
}

#[tokio::test]
async fn health_degrades_when_any_probe_fails() {
    let environment = Environment::new();
    environment
        .register_health_probe(Arc::new(FixedProbe { name: "store", status: ProbeStatus::Healthy }));
    environment.register_health_probe(Arc::new(FixedProbe {
        name: "queue",
        status: ProbeStatus::unhealthy("broker unreachable"),
    }));

    let (parts, body) = fetch_health(environment).await;

    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["probes"][0]["healthy"], true);
    assert_eq!(body["probes"][1]["name"], "queue");
    assert_eq!(body["probes"][1]["healthy"], false);
    assert_eq!(body["probes"][1]["message"], "broker unreachable");
}
