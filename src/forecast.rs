use std::time::Instant;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::cli::ForecastArgs;
use crate::data::{self, SeriesSource};
use crate::engine::{self, Forecast, SimulationRequest};
use crate::render;
use crate::report;

/// Run the `forecast` command.
pub fn run(args: &ForecastArgs) -> Result<()> {
    let series = match (&args.file, args.sample) {
        (_, true) => SeriesSource::Sample(&args.sample_csv)
            .load(&args.column)
            .with_context(|| format!("loading sample {}", args.sample_csv.display()))?,
        (Some(path), false) => data::load_series_from_path(path, &args.column)
            .with_context(|| format!("loading {}", path.display()))?,
        (None, false) => anyhow::bail!("either FILE or --sample is required"),
    };

    let request = simulation_request(args);
    info!(
        observations = series.len(),
        method = %request.method,
        simulations = request.simulation_count(),
        "running forecast"
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let started = Instant::now();
    let forecast = engine::forecast(&series, &request, &mut rng).context("running simulation")?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "forecast complete");

    report::print_table(&forecast, series.len());
    println!();
    print!("{}", render::render_ascii(&forecast.histogram, 40));

    if let Some(ref path) = args.svg {
        let svg = render::render_svg(&forecast.histogram, &render::chart_title(forecast.method));
        render::write_output(&svg, Some(path))
            .with_context(|| format!("writing {}", path.display()))?;
    }

    if let Some(ref path) = args.output {
        write_json(&forecast, path)?;
    }

    Ok(())
}

/// Normalize the requested count and cap it at `--max-simulations`.
fn simulation_request(args: &ForecastArgs) -> SimulationRequest {
    SimulationRequest::from_signed(args.method, Some(args.simulations)).clamped(args.max_simulations)
}

fn write_json(forecast: &Forecast, path: &std::path::Path) -> Result<()> {
    let json = serde_json::to_string_pretty(forecast)?;
    render::write_output(&json, Some(path)).with_context(|| format!("writing {}", path.display()))
}
