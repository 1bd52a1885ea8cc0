use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use tracing::debug;

use super::series::{Series, project};
use super::stats::{mean, sample_std_dev};
use super::EngineError;

/// Normal distribution fitted to the observed differences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalFit {
    pub mu: f64,
    pub sigma: f64,
}

impl NormalFit {
    /// Fit mean and Bessel-corrected spread.
    ///
    /// - no differences: unit spread around zero, so a single observation
    ///   still yields a spread-out forecast instead of a point mass
    /// - one difference: that change, with zero spread
    pub fn from_differences(diffs: &[f64]) -> Self {
        match diffs {
            [] => {
                debug!("no differences to fit, using N(0, 1)");
                Self { mu: 0.0, sigma: 1.0 }
            }
            [only] => Self {
                mu: *only,
                sigma: 0.0,
            },
            _ => Self {
                mu: mean(diffs),
                sigma: sample_std_dev(diffs),
            },
        }
    }

    /// Draw `n` independent changes. Zero spread yields `n` copies of `mu`.
    pub fn sample_changes<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>, EngineError> {
        if self.sigma == 0.0 {
            return Ok(vec![self.mu; n]);
        }
        let normal = Normal::new(self.mu, self.sigma)
            .map_err(|_| EngineError::InvalidSpread { sigma: self.sigma })?;
        Ok((0..n).map(|_| normal.sample(rng)).collect())
    }
}

/// Parametric Monte Carlo: last observation + N(mu, sigma) changes.
pub fn simulate_parametric<R: Rng + ?Sized>(
    series: &Series,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>, EngineError> {
    let fit = NormalFit::from_differences(&series.differences());
    debug!(mu = fit.mu, sigma = fit.sigma, n, "parametric fit");
    let changes = fit.sample_changes(n, rng)?;
    Ok(project(series.last(), &changes))
}
