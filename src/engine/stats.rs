use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::EngineError;

/// Descriptive statistics of the simulated next values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryStatistics {
    pub mean: f64,
    pub median: f64,
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    /// Sample standard deviation (N-1). `None` when there is a single
    /// simulated value, where it is undefined.
    pub standard_deviation: Option<f64>,
}

/// Reduce simulated values to mean, median, interpolated percentiles and spread.
pub fn summarize(values: &[f64]) -> Result<SummaryStatistics, EngineError> {
    if values.is_empty() {
        return Err(EngineError::NoSimulatedValues);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let first = sorted[0];
    let point_mass = first == sorted[sorted.len() - 1];

    let standard_deviation = match (values.len(), point_mass) {
        (1, _) => None,
        (_, true) => Some(0.0),
        _ => Some(sample_std_dev(values)),
    };

    Ok(SummaryStatistics {
        // summation drift would move the mean off an identical-value sample
        mean: if point_mass { first } else { mean(values) },
        median: percentile(&sorted, 50.0),
        p10: percentile(&sorted, 10.0),
        p25: percentile(&sorted, 25.0),
        p75: percentile(&sorted, 75.0),
        p90: percentile(&sorted, 90.0),
        standard_deviation,
    })
}

pub(crate) fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Bessel-corrected standard deviation. Callers guard `len < 2`.
pub(crate) fn sample_std_dev(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return f64::NAN;
    }
    let m = mean(xs);
    let var = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
    var.sqrt()
}

/// Linear interpolation percentile on a sorted, non-empty slice.
pub(crate) fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let idx = (pct / 100.0) * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    let frac = idx - lo as f64;

    if hi >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}
