//! brick-reporter - publish installed brick package manifests to the
//! registry service.
//!
//! Runs as the final step of a package install/upgrade pipeline.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use brick_reporter::Result;
use brick_reporter::cli::{Cli, Invocation};
use brick_reporter::discovery::EnsLookup;
use brick_reporter::gate::GetEnvGate;
use brick_reporter::pipeline;
use brick_reporter::reporter::RegistryReporter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let (org, install_path) = match cli.invocation() {
        // Older install postscripts call this tool with only the install
        // path; accept and do nothing.
        Invocation::LegacyNoop => return ExitCode::SUCCESS,
        Invocation::Usage => {
            println!("{}", Cli::usage());
            return ExitCode::FAILURE;
        }
        Invocation::Report { org, install_path } => (org, install_path),
    };

    match run(&org, Path::new(&install_path)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(org: &str, install_path: &Path) -> Result<()> {
    let gate = GetEnvGate::from_env();
    let nameservice = EnsLookup::from_env();
    let reporter = RegistryReporter::new()?;
    pipeline::run(&gate, &nameservice, &reporter, org, install_path)?;
    Ok(())
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,brick_reporter=info",
        1 => "info,brick_reporter=debug",
        2 => "debug,brick_reporter=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
