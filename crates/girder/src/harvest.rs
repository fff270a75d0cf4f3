use crate::bundle::BundleError;
use girder_graph::Injector;
use girder_kernel::{Environment, HealthProbe};
use std::sync::Arc;
use tracing::{debug, info};

/// Harvests health-probe contributions from a built graph and registers
/// them with the environment.
///
/// A graph without the probe set is left alone; an empty set registers
/// nothing. Probes are registered in the order their modules contributed
/// them.
///
/// # Errors
/// Probe provider failures propagate unchanged.
pub fn harvest(graph: &Injector, environment: &Environment) -> Result<(), BundleError> {
    match graph.get_set::<Arc<dyn HealthProbe>>()? {
        None => debug!("no health-probe contributions in the graph"),
        Some(probes) => {
            let count = probes.len();
            for probe in probes {
                environment.register_health_probe(probe);
            }
            info!(count, "health probes registered");
        }
    }
    Ok(())
}
