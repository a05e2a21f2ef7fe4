//! Configuration from the environment.

use anyhow::Result;

use crate::output::OutputFormat;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level when `RUST_LOG` is unset (trace, debug, info, warn, error).
    pub log_level: String,

    /// UUID of the director scopes are checked against.
    pub director_uuid: String,

    /// Output format when `--format` is not given.
    pub output: OutputFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let log_level = lookup("FLEET_LOG_LEVEL").unwrap_or_else(|| "warn".to_string());

        let director_uuid =
            lookup("FLEET_DIRECTOR_UUID").unwrap_or_else(|| "director".to_string());

        let output: OutputFormat = match lookup("FLEET_OUTPUT") {
            Some(value) => value.parse()?,
            None => OutputFormat::default(),
        };

        Ok(Self {
            log_level,
            director_uuid,
            output,
        })
    }
}
