//! fleetctl - dry-run CLI for the fleet instance planner
//!
//! Loads a deployment snapshot, runs a planning pass against a repository
//! that provisions nothing, and prints what would be reused, created, and
//! removed. Also answers scope-based permission questions.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod dry_run;
mod error;
mod output;
mod snapshot;

use commands::Cli;
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = Config::from_env().and_then(|config| {
        init_tracing(&config);
        cli.run(config)
    });

    if let Err(e) = result {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
