//! Pipeline orchestrator.
//!
//! Wires gate → collect → resolve → report. Capabilities with external side
//! effects (gate check, name resolution) come in as traits so tests can
//! substitute them. No stage is retried; the first failure terminates the
//! run with its cause.

use std::path::Path;

use tracing::{debug, info};

use crate::collector;
use crate::discovery::{self, NameService, REGISTRY_CONSUMER, REGISTRY_SERVICE};
use crate::error::Result;
use crate::gate::{GateDecision, PreconditionCheck};
use crate::reporter::RegistryReporter;

/// Terminal state of a successful pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Both import phases completed.
    Completed,
    /// Reporting is disabled for this environment; nothing was collected
    /// or sent. Treated as success by the invoker.
    Skipped,
}

pub fn run(
    gate: &dyn PreconditionCheck,
    nameservice: &dyn NameService,
    reporter: &RegistryReporter,
    org: &str,
    install_path: &Path,
) -> Result<PipelineOutcome> {
    if gate.check()? == GateDecision::Disabled {
        info!("brick reporting disabled for this environment, skipping");
        return Ok(PipelineOutcome::Skipped);
    }

    let bundle = collector::collect(install_path)?;
    info!(package = %bundle.package_name, "collected package bundle");

    let resolution = nameservice.resolve(REGISTRY_SERVICE, REGISTRY_CONSUMER)?;
    let endpoint = discovery::expect_resolved(REGISTRY_SERVICE, resolution)?;
    debug!(host = %endpoint.host, port = endpoint.port, "resolved registry endpoint");

    reporter.report(&endpoint, org, &bundle)?;
    info!(package = %bundle.package_name, org, "reported package to registry");
    Ok(PipelineOutcome::Completed)
}
