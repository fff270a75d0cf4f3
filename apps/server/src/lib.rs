//! # Girder Server
//!
//! A demo host wiring a [`Bundle`] of modules into an Axum server: modules
//! are resolved against the loaded configuration, the dependency graph is
//! built, the request-pipeline adapter and health probes are installed on
//! the [`Environment`], and the router serves the system endpoints plus
//! whatever the resource table routes into the graph.
//!
//! ## Example
//! ```no_run
//! use girder_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(4690)
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

mod modules;
mod router;

use anyhow::{Context, Result};
use axum_server::Handle;
use girder::domain::config::AppConfig;
use girder::{Bundle, Environment, Injector, Stage};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{debug, error, info};

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: AppConfig,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: AppConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Consumes the builder and initializes the server.
    ///
    /// # Process
    /// 1. Creates the host [`Environment`] and seeds its resource table
    /// 2. Assembles the module bundle and runs it against the configuration
    /// 3. Keeps the built graph for the lifetime of the server
    ///
    /// # Errors
    /// Returns an error if module resolution or graph construction fails;
    /// nothing is served in that case.
    pub fn build(self) -> Result<Server> {
        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);

        info!(
            address = %address,
            "Initializing server"
        );

        let environment = Environment::new();
        environment.set_resource_config(self.cfg.resources.clone());
        for (path, resource) in self.cfg.resources.iter() {
            debug!(path, resource, "route seeded");
        }

        let graph = Bundle::builder()
            .with_module(modules::PlatformModule)
            .with_configured_module(modules::InfoModule)
            .with_stage(Stage::Production)?
            .build()
            .run(self.cfg.clone(), &environment)
            .context("Platform bootstrap failed")?;

        Ok(Server { cfg: self.cfg, environment, graph })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    cfg: AppConfig,
    environment: Environment,
    graph: Injector,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Starts the server and runs until the shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address.
    pub async fn run(self) -> Result<()> {
        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);

        info!(
            address = %address,
            "Starting server"
        );

        let app = router::init(self.environment.clone());

        // Graceful shutdown on Ctrl+C / SIGTERM
        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(std::time::Duration::from_secs(30)));
        });

        axum_server::bind(address)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTP server failed")?;

        info!("Server shutdown complete");
        Ok(())
    }

    /// Returns a reference to the host environment.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Returns a handle to the dependency graph built at startup.
    #[must_use]
    pub const fn graph(&self) -> &Injector {
        &self.graph
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res.context("Ctrl+C signal received")?;
        },
        res = terminate => {
            res.context("SIGTERM signal received")?;
        },
    }

    Ok(())
}
