use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::{EngineError, Series};

pub const DEFAULT_SIMULATIONS: usize = 10_000;

/// Upper bound on simulations per request unless the host sets its own.
pub const DEFAULT_MAX_SIMULATIONS: usize = 1_000_000;

/// Simulation strategy for the next-step change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Normal distribution fitted to the differences.
    #[default]
    Parametric,
    /// Resampling of the observed differences.
    Empirical,
}

impl Method {
    /// Form-field parsing: "parametric" selects the normal model, anything
    /// else falls through to the bootstrap.
    pub fn from_form(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("parametric") {
            Method::Parametric
        } else {
            Method::Empirical
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Method::Parametric => "Parametric Normal",
            Method::Empirical => "Empirical Bootstrap",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parametric" | "normal" => Ok(Method::Parametric),
            "empirical" | "bootstrap" => Ok(Method::Empirical),
            other => Err(format!(
                "unknown method '{other}'. Use: parametric, empirical"
            )),
        }
    }
}

/// Which simulator to run and how many draws. The count is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SimulationRequest {
    pub method: Method,
    simulation_count: usize,
}

impl SimulationRequest {
    /// A zero count is replaced by [`DEFAULT_SIMULATIONS`].
    pub fn new(method: Method, simulation_count: usize) -> Self {
        let simulation_count = if simulation_count == 0 {
            DEFAULT_SIMULATIONS
        } else {
            simulation_count
        };
        Self {
            method,
            simulation_count,
        }
    }

    /// Normalize raw form input. Missing, unparsable, zero or negative
    /// counts become [`DEFAULT_SIMULATIONS`].
    pub fn from_form(method: &str, simulations: Option<&str>) -> Self {
        let count = simulations
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(normalize_count)
            .unwrap_or(DEFAULT_SIMULATIONS);
        Self::new(Method::from_form(method), count)
    }

    /// Same normalization for signed numeric input (JSON bodies, CLI).
    pub fn from_signed(method: Method, simulations: Option<i64>) -> Self {
        Self::new(
            method,
            simulations.map(normalize_count).unwrap_or(DEFAULT_SIMULATIONS),
        )
    }

    /// Cap the count at a host-imposed upper bound.
    pub fn clamped(self, max: usize) -> Self {
        Self::new(self.method, self.simulation_count.min(max.max(1)))
    }

    pub fn simulation_count(&self) -> usize {
        self.simulation_count
    }
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self::new(Method::default(), DEFAULT_SIMULATIONS)
    }
}

/// Raw series-plus-settings input, as sent by JSON clients.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ForecastInput {
    pub series: Vec<f64>,
    #[serde(default)]
    pub method: Method,
    /// Zero, negative, missing or unparsable means [`DEFAULT_SIMULATIONS`].
    /// Numeric strings and whole floats are accepted.
    #[serde(default, deserialize_with = "lenient_count")]
    pub nsim: Option<i64>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ForecastInput {
    pub fn into_parts(self) -> Result<(Series, SimulationRequest), EngineError> {
        let series = Series::new(self.series)?;
        Ok((series, SimulationRequest::from_signed(self.method, self.nsim)))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let raw = Option::<RawCount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawCount::Int(n)) => Some(n),
        Some(RawCount::Float(f)) if f.is_finite() => Some(f.trunc() as i64),
        Some(RawCount::Text(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

fn normalize_count(raw: i64) -> usize {
    if raw <= 0 {
        DEFAULT_SIMULATIONS
    } else {
        usize::try_from(raw).unwrap_or(usize::MAX)
    }
}
