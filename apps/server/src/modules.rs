//! Demo modules wired into the bundle by [`ServerBuilder`](crate::ServerBuilder).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use girder::domain::config::AppConfig;
use girder::kernel::{HealthProbe, ProbeStatus};
use girder::{Binder, ConfiguredModule, Module, ModuleError, Resource};
use std::sync::Arc;

/// Answers readiness checks routed through the dispatcher.
struct StatusResource;

impl Resource for StatusResource {
    fn get(&self) -> Response {
        (StatusCode::OK, "ready").into_response()
    }
}

/// Reports the listen address the server was configured with.
struct InfoResource {
    summary: String,
}

impl Resource for InfoResource {
    fn get(&self) -> Response {
        (StatusCode::OK, self.summary.clone()).into_response()
    }
}

struct ListenerProbe {
    port: u16,
}

impl HealthProbe for ListenerProbe {
    fn name(&self) -> &str {
        "listener"
    }

    fn check(&self) -> ProbeStatus {
        if self.port == 0 {
            ProbeStatus::unhealthy("server port is unset")
        } else {
            ProbeStatus::Healthy
        }
    }
}

/// Plain platform bindings: the status resource under the name the default
/// resource table points at.
pub(crate) struct PlatformModule;

impl Module for PlatformModule {
    fn configure(&self, binder: &mut Binder) {
        binder.bind_named("status", Arc::new(StatusResource) as Arc<dyn Resource>);
    }
}

/// Configuration-aware bindings: an info resource rendered from the runtime
/// configuration, plus a probe over the configured listener.
pub(crate) struct InfoModule;

impl ConfiguredModule<AppConfig> for InfoModule {
    fn with_configuration(
        &self,
        configuration: &AppConfig,
    ) -> Result<Box<dyn Module>, ModuleError> {
        let server = &configuration.server;
        let summary = format!("listening on {}:{}", server.address, server.port);
        let port = server.port;

        Ok(Box::new(move |binder: &mut Binder| {
            binder.bind_named(
                "info",
                Arc::new(InfoResource { summary: summary.clone() }) as Arc<dyn Resource>,
            );
            binder.add_to_set::<Arc<dyn HealthProbe>>(Arc::new(ListenerProbe { port }));
        }))
    }
}
