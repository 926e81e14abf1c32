//! Registry reporter.
//!
//! Sends a collected [`PackageBundle`] to the registry service in two
//! strictly sequential calls: atoms first, snippets second. Downstream
//! consumers assume atoms exist before snippets reference them, so a
//! failed atom import aborts the run and the snippet call is never issued.
//! There is no rollback: a snippet-phase failure leaves the atoms reported,
//! an intentionally observable partial-success state the invoker owns.

use std::fmt;

use serde_json::{Value, json};
use tracing::debug;

use crate::collector::PackageBundle;
use crate::discovery::ServiceEndpoint;
use crate::error::{ReporterError, Result};

const ATOM_IMPORT_PATH: &str = "/api/v1/brick/atom/import";
const SNIPPET_IMPORT_PATH: &str = "/api/v1/brick/snippet/import";

const ORG_HEADER: &str = "org";
const USER_HEADER: &str = "user";
const REPORT_USER: &str = "defaultUser";

/// Which of the two sequential import calls failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Atom,
    Snippet,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom => f.write_str("atom"),
            Self::Snippet => f.write_str("snippet"),
        }
    }
}

/// Blocking client for the registry's import endpoints.
///
/// Each call may open its own connection; nothing is reused or retried.
pub struct RegistryReporter {
    client: reqwest::blocking::Client,
}

impl RegistryReporter {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Run the two-phase import protocol against `endpoint`.
    ///
    /// At most one request is sent per phase. A non-2xx response fails the
    /// run with [`ReporterError::Report`] tagged with the phase it died in.
    pub fn report(&self, endpoint: &ServiceEndpoint, org: &str, bundle: &PackageBundle) -> Result<()> {
        let base = format!("http://{}:{}", endpoint.host, endpoint.port);

        let atom_payload = json!({
            "packageName": bundle.package_name,
            "data": {
                "stories": bundle.stories,
                "bricks": bundle.bricks,
            },
        });
        self.post(Phase::Atom, &format!("{base}{ATOM_IMPORT_PATH}"), org, &atom_payload)?;

        let snippet_payload = json!({
            "packageName": bundle.package_name,
            "snippets": bundle.snippets,
        });
        self.post(
            Phase::Snippet,
            &format!("{base}{SNIPPET_IMPORT_PATH}"),
            org,
            &snippet_payload,
        )?;
        Ok(())
    }

    fn post(&self, phase: Phase, url: &str, org: &str, payload: &Value) -> Result<()> {
        debug!(%phase, url, "sending import request");
        let response = self
            .client
            .post(url)
            .header(ORG_HEADER, org)
            .header(USER_HEADER, REPORT_USER)
            .json(payload)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ReporterError::Report {
                phase,
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display_matches_wire_terminology() {
        assert_eq!(Phase::Atom.to_string(), "atom");
        assert_eq!(Phase::Snippet.to_string(), "snippet");
    }
}
