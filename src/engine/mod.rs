//! Monte Carlo forecasting engine.
//!
//! series → differences → {parametric | empirical} changes → projection →
//! summary statistics + histogram. Pure and synchronous; the only state is
//! the caller-supplied RNG.

pub mod empirical;
pub mod histogram;
pub mod parametric;
pub mod request;
pub mod series;
pub mod stats;

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use empirical::simulate_empirical;
pub use histogram::{HISTOGRAM_BINS, HistogramSpec, build_histogram};
pub use parametric::{NormalFit, simulate_parametric};
pub use request::{
    DEFAULT_MAX_SIMULATIONS, DEFAULT_SIMULATIONS, ForecastInput, Method, SimulationRequest,
};
pub use series::{Series, differences, project};
pub use stats::{SummaryStatistics, summarize};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("series is empty")]
    EmptySeries,

    #[error("observation {index} is not finite ({value})")]
    NonFiniteObservation { index: usize, value: f64 },

    #[error("no simulated values to summarize")]
    NoSimulatedValues,

    #[error("cannot sample a normal distribution with spread {sigma}")]
    InvalidSpread { sigma: f64 },
}

impl EngineError {
    /// Precondition violations the caller should report back as bad input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            EngineError::EmptySeries
                | EngineError::NonFiniteObservation { .. }
                | EngineError::NoSimulatedValues
        )
    }
}

/// Summary of one forecast run. The simulated values themselves are not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Forecast {
    pub method: Method,
    pub last_observation: f64,
    pub simulation_count: usize,
    pub statistics: SummaryStatistics,
    pub histogram: HistogramSpec,
}

/// Draw `request.simulation_count()` simulated next values.
pub fn simulate<R: Rng + ?Sized>(
    series: &Series,
    request: &SimulationRequest,
    rng: &mut R,
) -> Result<Vec<f64>, EngineError> {
    let n = request.simulation_count();
    match request.method {
        Method::Parametric => simulate_parametric(series, n, rng),
        Method::Empirical => Ok(simulate_empirical(series, n, rng)),
    }
}

/// Run the full pipeline and reduce the simulated values.
pub fn forecast<R: Rng + ?Sized>(
    series: &Series,
    request: &SimulationRequest,
    rng: &mut R,
) -> Result<Forecast, EngineError> {
    let simulated = simulate(series, request, rng)?;
    let statistics = summarize(&simulated)?;
    let histogram = build_histogram(&simulated)?;

    Ok(Forecast {
        method: request.method,
        last_observation: series.last(),
        simulation_count: simulated.len(),
        statistics,
        histogram,
    })
}
