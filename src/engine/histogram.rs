use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::EngineError;

pub const HISTOGRAM_BINS: usize = 40;

/// Half-width added on each side when every value is identical. Large
/// magnitudes widen further so the edges stay distinct.
pub const DEGENERATE_HALF_WIDTH: f64 = 0.5;

/// Equal-width frequency distribution: `bin_edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HistogramSpec {
    pub bin_edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl HistogramSpec {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(lower, upper, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.bin_edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }
}

/// Bin values into [`HISTOGRAM_BINS`] equal-width bins over their range.
pub fn build_histogram(values: &[f64]) -> Result<HistogramSpec, EngineError> {
    build_histogram_with_bins(values, HISTOGRAM_BINS)
}

/// Bins are half-open `[lo, hi)` except the last, which also includes its upper edge.
pub fn build_histogram_with_bins(values: &[f64], bins: usize) -> Result<HistogramSpec, EngineError> {
    if values.is_empty() || bins == 0 {
        return Err(EngineError::NoSimulatedValues);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if min == max {
        let half = DEGENERATE_HALF_WIDTH.max(min.abs() * f64::EPSILON * bins as f64);
        (min - half, max + half)
    } else {
        (min, max)
    };

    let width = (hi - lo) / bins as f64;
    let bin_edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect();

    let mut counts = vec![0u64; bins];
    for &v in values {
        let mut idx = (((v - lo) / width) as usize).min(bins - 1);
        // float division can land one bin off near an edge
        if v < bin_edges[idx] {
            idx = idx.saturating_sub(1);
        } else if idx + 1 < bins && v >= bin_edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }

    Ok(HistogramSpec { bin_edges, counts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_total() {
        let values: Vec<f64> = (0..1000).map(|i| (i as f64).sin() * 3.0).collect();
        let hist = build_histogram(&values).unwrap();
        assert_eq!(hist.bin_edges.len(), HISTOGRAM_BINS + 1);
        assert_eq!(hist.counts.len(), HISTOGRAM_BINS);
        assert_eq!(hist.total(), 1000);
        assert!(hist.bin_edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let hist = build_histogram_with_bins(&[0.0, 1.0, 2.0, 4.0], 4).unwrap();
        assert_eq!(hist.bin_edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(hist.counts, vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_degenerate_range_is_widened() {
        let hist = build_histogram(&[20.0; 50]).unwrap();
        assert_eq!(hist.bin_edges[0], 19.5);
        assert_eq!(hist.bin_edges[HISTOGRAM_BINS], 20.5);
        assert_eq!(hist.total(), 50);
        assert_eq!(hist.counts[HISTOGRAM_BINS / 2], 50);
    }

    #[test]
    fn test_degenerate_range_at_large_magnitude() {
        for c in [1e17, -4.2e20, 9.0e15] {
            let hist = build_histogram(&[c; 10]).unwrap();
            assert!(hist.bin_edges.windows(2).all(|w| w[0] < w[1]), "edges collapse at {c}");
            assert!(hist.bin_edges[0] < c && c < hist.bin_edges[HISTOGRAM_BINS]);
            assert_eq!(hist.total(), 10);
        }
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(build_histogram(&[]).is_err());
    }
}
