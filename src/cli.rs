//! Command-line surface.
//!
//! The argument contract is inherited from the deployment pipeline that
//! invokes this tool: one positional argument is a legacy no-op (older
//! install postscripts pass only the install path), two positionals
//! (`org`, `install_path`) run the pipeline, and any other count prints
//! usage on stdout and exits 1. Arity is therefore matched on a positional
//! list instead of letting clap reject the surplus with its own exit code.

use clap::{ArgAction, Parser};

const USAGE: &str = "Usage: brick-reporter <org> <install_path>";

#[derive(Parser, Debug)]
#[command(
    name = "brick-reporter",
    version,
    about = "Report installed brick package manifests to the registry service"
)]
pub struct Cli {
    /// `<org> <install_path>` (legacy callers pass only the install path)
    pub args: Vec<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long)]
    pub quiet: bool,
}

/// What this invocation asks for, decided purely by positional arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Single-argument legacy call: succeed without doing anything.
    LegacyNoop,
    Report { org: String, install_path: String },
    /// Wrong arity: print usage, exit 1.
    Usage,
}

impl Cli {
    #[must_use]
    pub fn invocation(&self) -> Invocation {
        match self.args.as_slice() {
            [_install_path] => Invocation::LegacyNoop,
            [org, install_path] => Invocation::Report {
                org: org.clone(),
                install_path: install_path.clone(),
            },
            _ => Invocation::Usage,
        }
    }

    #[must_use]
    pub const fn usage() -> &'static str {
        USAGE
    }
}
