use rand::Rng;
use tracing::debug;

use super::series::{Series, project};

/// Bootstrap: resample observed changes with replacement.
///
/// Every output is `last + d` for some observed difference `d`. A single
/// observation has no differences to draw from and projects zero change.
pub fn simulate_empirical<R: Rng + ?Sized>(series: &Series, n: usize, rng: &mut R) -> Vec<f64> {
    let diffs = series.differences();
    let changes = if diffs.is_empty() {
        debug!("empty difference pool, projecting zero change");
        vec![0.0; n]
    } else {
        (0..n)
            .map(|_| diffs[rng.random_range(0..diffs.len())])
            .collect()
    };
    project(series.last(), &changes)
}
