//! CLI commands.

mod authorize;
mod plan;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::output::OutputFormat;

/// fleetctl - Dry-run the fleet instance planner.
#[derive(Debug, Parser)]
#[command(name = "fleetctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json). Defaults to FLEET_OUTPUT.
    #[arg(long, global = true)]
    format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Plan a deployment snapshot without changing anything.
    Plan(plan::PlanCommand),

    /// Check whether scopes grant a right.
    Authorize(authorize::AuthorizeCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub fn run(self, config: Config) -> Result<()> {
        let format = match self.format.as_deref() {
            Some(format) => format.parse()?,
            None => config.output,
        };

        let ctx = CommandContext { config, format };

        match self.command {
            Commands::Plan(cmd) => cmd.run(ctx),
            Commands::Authorize(cmd) => cmd.run(ctx),
            Commands::Version => {
                println!("fleetctl {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
}
