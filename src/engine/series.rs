use serde::{Deserialize, Serialize};

use super::EngineError;

/// Chronologically ordered observations. Always non-empty and finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Series(Vec<f64>);

impl Series {
    pub fn new(values: Vec<f64>) -> Result<Self, EngineError> {
        if values.is_empty() {
            return Err(EngineError::EmptySeries);
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(EngineError::NonFiniteObservation { index, value });
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed series; kept alongside `len` for
    /// clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent observation, the anchor every simulated change is added to.
    pub fn last(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    pub fn differences(&self) -> Vec<f64> {
        differences(&self.0)
    }
}

impl TryFrom<Vec<f64>> for Series {
    type Error = EngineError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Series> for Vec<f64> {
    fn from(series: Series) -> Self {
        series.0
    }
}

/// Period-over-period changes: `out[i] = values[i + 1] - values[i]`.
/// Empty for inputs shorter than two observations.
pub fn differences(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Add each simulated change to the last observation.
pub fn project(last: f64, changes: &[f64]) -> Vec<f64> {
    changes.iter().map(|change| last + change).collect()
}
