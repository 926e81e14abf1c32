//! Service locator.
//!
//! Translates the registry service's logical name into a concrete network
//! address through the platform nameservice. The lookup result is converted
//! into a [`Resolution`] sum type at this boundary so a non-positive session
//! sentinel can never be mistaken for a usable address downstream.
//!
//! No retries and no caching here; every pipeline run resolves fresh.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::{ReporterError, Result};

/// Logical name of the registry service.
pub const REGISTRY_SERVICE: &str = "logic.micro_app_service";

/// Consumer identity presented to the nameservice.
pub const REGISTRY_CONSUMER: &str = "web.brick_next";

const DEFAULT_ENS_TOOL: &str = "/usr/local/easyops/deploy_init/tools/ens_lookup";

/// Env var overriding the nameservice lookup tool path.
pub const ENS_TOOL_ENV: &str = "BRICK_REPORTER_ENS_LOOKUP";

/// Resolved address of a service. Created fresh per pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub host: String,
    pub port: u16,
}

/// Outcome of a nameservice lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved {
        session_id: i64,
        endpoint: ServiceEndpoint,
    },
    /// The lookup answered, but with an invalid session sentinel.
    Invalid { session_id: i64 },
}

/// Name-resolution capability. The production implementation shells out to
/// the platform nameservice CLI; tests substitute their own.
pub trait NameService {
    fn resolve(&self, service: &str, consumer: &str) -> Result<Resolution>;
}

/// Require a usable endpoint from a lookup result.
pub fn expect_resolved(service: &str, resolution: Resolution) -> Result<ServiceEndpoint> {
    match resolution {
        Resolution::Resolved { endpoint, .. } => Ok(endpoint),
        Resolution::Invalid { session_id } => Err(ReporterError::Discovery {
            service: service.to_string(),
            session_id,
        }),
    }
}

/// Production nameservice adapter.
///
/// Runs `{tool} {service} {consumer}` and expects a single line of
/// whitespace-separated `session_id ip port` on stdout.
pub struct EnsLookup {
    tool: PathBuf,
}

impl EnsLookup {
    /// Build from the environment, falling back to the platform tool path.
    #[must_use]
    pub fn from_env() -> Self {
        let tool = std::env::var(ENS_TOOL_ENV)
            .map_or_else(|_| PathBuf::from(DEFAULT_ENS_TOOL), PathBuf::from);
        Self { tool }
    }

    #[must_use]
    pub fn with_tool(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }
}

impl NameService for EnsLookup {
    fn resolve(&self, service: &str, consumer: &str) -> Result<Resolution> {
        debug!(tool = %self.tool.display(), service, consumer, "nameservice lookup");
        let output = Command::new(&self.tool).arg(service).arg(consumer).output()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_reply(stdout.trim())
    }
}

/// Parse a `session_id ip port` reply. A non-positive session is reported
/// as [`Resolution::Invalid`] without requiring the address fields.
fn parse_reply(reply: &str) -> Result<Resolution> {
    let mut fields = reply.split_whitespace();
    let session_id: i64 = fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ReporterError::DiscoveryProtocol(reply.to_string()))?;
    if session_id <= 0 {
        return Ok(Resolution::Invalid { session_id });
    }
    let host = fields
        .next()
        .ok_or_else(|| ReporterError::DiscoveryProtocol(reply.to_string()))?
        .to_string();
    let port: u16 = fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ReporterError::DiscoveryProtocol(reply.to_string()))?;
    Ok(Resolution::Resolved {
        session_id,
        endpoint: ServiceEndpoint { host, port },
    })
}
