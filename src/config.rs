use std::path::PathBuf;

use crate::data::{DEFAULT_COLUMN, SAMPLE_CSV};
use crate::engine::{DEFAULT_MAX_SIMULATIONS, DEFAULT_SIMULATIONS};

/// Process-wide settings for the `serve` command, built once at startup and
/// handed to the router state.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Dataset used when a request asks for the bundled sample.
    pub sample_csv: PathBuf,
    /// Column holding the observations.
    pub value_column: String,
    pub default_simulations: usize,
    pub max_simulations: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            sample_csv: PathBuf::from(SAMPLE_CSV),
            value_column: DEFAULT_COLUMN.to_string(),
            default_simulations: DEFAULT_SIMULATIONS,
            max_simulations: DEFAULT_MAX_SIMULATIONS,
        }
    }
}

impl ServerConfig {
    pub fn from_cli(cli: &crate::cli::ServeArgs) -> anyhow::Result<Self> {
        if cli.max_simulations == 0 {
            anyhow::bail!("--max-simulations must be positive");
        }
        if cli.column.trim().is_empty() {
            anyhow::bail!("--column must not be empty");
        }
        Ok(Self {
            host: cli.host.clone(),
            port: cli.port,
            sample_csv: cli.sample_csv.clone(),
            value_column: cli.column.clone(),
            default_simulations: DEFAULT_SIMULATIONS,
            max_simulations: cli.max_simulations,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
