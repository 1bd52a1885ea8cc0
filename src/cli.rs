use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::data::{DEFAULT_COLUMN, SAMPLE_CSV};
use crate::engine::{DEFAULT_MAX_SIMULATIONS, DEFAULT_SIMULATIONS, Method};

/// Monte Carlo next-value forecasting from a univariate time series.
#[derive(Parser)]
#[command(name = "mc-forecast", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Forecast the next value of a CSV series and print summary statistics
    Forecast(ForecastArgs),

    /// Serve the upload form and JSON API over HTTP
    Serve(ServeArgs),

    /// Output the JSON schema of a forecast result
    Schema,
}

#[derive(Args)]
pub struct ForecastArgs {
    /// CSV file with a header row (omit with --sample)
    #[arg(required_unless_present = "sample")]
    pub file: Option<PathBuf>,

    /// Use the bundled sample dataset instead of FILE
    #[arg(long, conflicts_with = "file")]
    pub sample: bool,

    /// Path of the bundled sample dataset
    #[arg(long, default_value = SAMPLE_CSV)]
    pub sample_csv: PathBuf,

    /// Column holding the observations (case-sensitive)
    #[arg(long, default_value = DEFAULT_COLUMN)]
    pub column: String,

    /// Simulation method: parametric (normal) or empirical (bootstrap)
    #[arg(long, default_value = "parametric")]
    pub method: Method,

    /// Number of simulations; zero or negative falls back to the default
    #[arg(long, short = 'n', default_value_t = DEFAULT_SIMULATIONS as i64, allow_negative_numbers = true)]
    pub simulations: i64,

    /// Larger simulation counts are capped here
    #[arg(long, default_value_t = DEFAULT_MAX_SIMULATIONS)]
    pub max_simulations: usize,

    /// Random seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the histogram as SVG to this file
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Write the forecast as JSON to this file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Path of the bundled sample dataset
    #[arg(long, default_value = SAMPLE_CSV)]
    pub sample_csv: PathBuf,

    /// Column holding the observations (case-sensitive)
    #[arg(long, default_value = DEFAULT_COLUMN)]
    pub column: String,

    /// Requests asking for more simulations are capped here
    #[arg(long, default_value_t = DEFAULT_MAX_SIMULATIONS)]
    pub max_simulations: usize,
}
