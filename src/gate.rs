//! Reporting precondition gate.
//!
//! Before anything is collected or sent, the pipeline asks the deployment
//! environment whether brick reporting is enabled at all. The production
//! check shells out to the platform `get_env` tool; tests substitute the
//! [`PreconditionCheck`] trait instead of spawning subprocesses.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::{ReporterError, Result};

const GATE_SERVICE: &str = "micro_app_service";
const GATE_FLAG: &str = "report_brick_info";

const DEFAULT_GET_ENV_TOOL: &str = "/usr/local/easyops/deploy_init/tools/get_env.py";

/// Env var overriding the `get_env` tool path.
pub const GET_ENV_TOOL_ENV: &str = "BRICK_REPORTER_GET_ENV";

/// Exit code by which the tool signals "flag not set for this environment".
const DISABLED_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Enabled,
    /// Reporting is switched off; the pipeline skips and exits successfully.
    Disabled,
}

pub trait PreconditionCheck {
    fn check(&self) -> Result<GateDecision>;
}

/// Production gate over the platform environment-configuration tool.
///
/// Outcome mapping: exit 0 with literal `true` on stdout means enabled,
/// exit 2 means disabled, and every other combination is a fatal
/// [`ReporterError::GateCheck`] carrying the exit code and output verbatim.
/// Note that exit 0 with any other output is fatal, not disabled.
pub struct GetEnvGate {
    tool: PathBuf,
}

impl GetEnvGate {
    /// Build from the environment, falling back to the platform tool path.
    #[must_use]
    pub fn from_env() -> Self {
        let tool = std::env::var(GET_ENV_TOOL_ENV)
            .map_or_else(|_| PathBuf::from(DEFAULT_GET_ENV_TOOL), PathBuf::from);
        Self { tool }
    }

    #[must_use]
    pub fn with_tool(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    fn command_string(&self) -> String {
        format!("{} {GATE_SERVICE} {GATE_FLAG}", self.tool.display())
    }
}

impl PreconditionCheck for GetEnvGate {
    fn check(&self) -> Result<GateDecision> {
        debug!(command = %self.command_string(), "running gate check");
        let output = Command::new(&self.tool)
            .arg(GATE_SERVICE)
            .arg(GATE_FLAG)
            .output()?;
        let status = output.status.code().unwrap_or(-1);
        let combined = merge_output(&output.stdout, &output.stderr);

        match (status, combined.as_str()) {
            (0, "true") => Ok(GateDecision::Enabled),
            (DISABLED_EXIT_CODE, _) => Ok(GateDecision::Disabled),
            _ => Err(ReporterError::GateCheck {
                command: self.command_string(),
                status,
                output: combined,
            }),
        }
    }
}

fn merge_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    let mut merged = stdout.trim().to_string();
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        if !merged.is_empty() {
            merged.push('\n');
        }
        merged.push_str(stderr);
    }
    merged
}
