//! Crate-wide error type.
//!
//! Every fallible operation in the pipeline returns [`Result`]; nothing is
//! retried or recovered internally. The binary surfaces errors as a message
//! on stderr and a non-zero exit status.

use std::path::PathBuf;

use thiserror::Error;

use crate::reporter::Phase;

pub type Result<T> = std::result::Result<T, ReporterError>;

#[derive(Error, Debug)]
pub enum ReporterError {
    /// The install path does not exist.
    #[error("could not find install path {}", .0.display())]
    PathNotFound(PathBuf),

    /// The install path exists but is not a directory.
    #[error("install path must be a dir: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The derived package name does not carry the required suffix.
    #[error("package suffix error; packageName {0}")]
    InvalidPackageName(String),

    /// The required bricks manifest is absent.
    #[error("could not find bricks.json path {}", .0.display())]
    MissingRequiredArtifact(PathBuf),

    /// A manifest file exists but is not valid JSON.
    #[error("malformed manifest {}: {source}", .path.display())]
    MalformedArtifact {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Name resolution returned an invalid session sentinel.
    #[error("get nameservice {service} error, session_id={session_id}")]
    Discovery { service: String, session_id: i64 },

    /// Name resolution produced output this crate cannot interpret.
    #[error("nameservice lookup output not understood: {0:?}")]
    DiscoveryProtocol(String),

    /// A registry import call came back with a non-2xx status.
    #[error("{phase} import failed with HTTP {status}: {body}")]
    Report { phase: Phase, status: u16, body: String },

    /// The gate-check subprocess finished with an unexpected outcome.
    #[error("{command} exec fail; status_code: {status}; output: {output}")]
    GateCheck {
        command: String,
        status: i32,
        output: String,
    },

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
