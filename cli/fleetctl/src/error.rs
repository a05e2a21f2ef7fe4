//! Error handling and display for the CLI.

use colored::Colorize;
use fleet_authz::AuthzError;
use fleet_reconcile::ConfigError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid output format '{0}' (expected table or json)")]
    InvalidFormat(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Authz(#[from] AuthzError),
}

impl CliError {
    /// Create a snapshot validation error.
    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::InvalidSnapshot(message.into())
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }

    if let Some(hint) = err.downcast_ref::<CliError>().and_then(hint) {
        eprintln!("\n{}", format!("Hint: {hint}").yellow());
    }
}

fn hint(err: &CliError) -> Option<&'static str> {
    match err {
        CliError::InvalidFormat(_) => Some("Use --format table or --format json."),
        CliError::Config(ConfigError::UnknownZone { .. }) => {
            Some("Declare the zone under [[zones]] or remove it from the job.")
        }
        CliError::Config(ConfigError::IndexHintNotReusable { .. }) => {
            Some("Hint the index of a running instance, or raise the instance count.")
        }
        CliError::Config(ConfigError::DuplicateJob { .. }) => {
            Some("Declare each job once per deployment.")
        }
        CliError::Config(_) => {
            Some("Each index may be requested once per job and must not be held by a kept instance.")
        }
        CliError::Authz(AuthzError::UnexpectedPermission { .. }) => {
            Some("Deployment subjects only support the admin and read rights.")
        }
        CliError::Authz(AuthzError::UnknownRight(_)) => {
            Some("Known rights: admin, read, create_deployment, list_deployments.")
        }
        CliError::Authz(AuthzError::UnexpectedSubject(_)) => {
            Some("Known subjects: director, deployment.")
        }
        CliError::InvalidSnapshot(_) => None,
    }
}
