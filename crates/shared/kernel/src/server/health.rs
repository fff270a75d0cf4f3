use crate::environment::Environment;
use crate::probe::ProbeStatus;
use axum::extract::State;
use axum::http::header;
use axum::{Json, response::IntoResponse};
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Instant;
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    /// Status
    status: &'static str,
    /// Version
    version: &'static str,
    /// Uptime in seconds
    uptime: u64,
    /// Registered probe results
    probes: Vec<ProbeReport>,
}

/// Result of one registered health probe
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ProbeReport {
    /// Probe name
    name: String,
    /// Whether the probe passed
    healthy: bool,
    /// Failure message, when unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[utoipa::path(
    get,
    path = "/health",
    responses((status = OK, description = "Healthcheck endpoint", body = HealthResponse)),
    tag = "System",
)]
#[allow(clippy::unused_async)]
pub(super) async fn health_handler(State(environment): State<Environment>) -> impl IntoResponse {
    let probes: Vec<ProbeReport> = environment
        .health_probes()
        .iter()
        .map(|probe| match probe.check() {
            ProbeStatus::Healthy => {
                ProbeReport { name: probe.name().to_owned(), healthy: true, message: None }
            }
            ProbeStatus::Unhealthy(message) => ProbeReport {
                name: probe.name().to_owned(),
                healthy: false,
                message: Some(message.into_owned()),
            },
        })
        .collect();

    let degraded = probes.iter().any(|report| !report.healthy);
    let body = HealthResponse {
        status: if degraded { "degraded" } else { "up" },
        version: env!("CARGO_PKG_VERSION"),
        uptime: START_TIME.elapsed().as_secs(),
        probes,
    };

    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}
