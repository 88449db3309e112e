//! reactup - React upgrade compatibility checker CLI tool
//!
//! Checks the React-related dependencies of a package.json against a target
//! React version and optionally rewrites incompatible ones.

use clap::Parser;
use colored::Colorize;
use reactup::cli::CliArgs;
use reactup::orchestrator::{Orchestrator, EXIT_ERROR};
use reactup::package_manager::SystemInstaller;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the verbosity flag
fn init_tracing(args: &CliArgs) {
    let default_level = if args.verbose { "reactup=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!args.json)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<u8> {
    if args.verbose && !args.json {
        eprintln!("reactup v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Project: {}", args.path.display());
    }

    let orchestrator = Orchestrator::new(args)?;
    let outcome = orchestrator.run(&SystemInstaller::new()).await?;

    let unresolved = outcome.unresolved();
    if !unresolved.is_empty() && outcome.write_result.is_some() {
        eprintln!(
            "{} {} incompatible package(s) left unchanged",
            "note:".cyan().bold(),
            unresolved.len()
        );
    }

    Ok(outcome.exit_code())
}
