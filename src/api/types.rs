use schemars::JsonSchema;
use serde::Serialize;

use crate::engine::Forecast;

// ── Request types ────────────────────────────────────────────────────

/// Fields collected from the multipart upload form.
#[derive(Default)]
pub struct ForecastForm {
    /// `(file_name, bytes)` of the uploaded CSV, if any.
    pub file: Option<(String, Vec<u8>)>,
    pub method: Option<String>,
    pub nsim: Option<String>,
    pub use_sample: Option<String>,
    pub seed: Option<String>,
}

impl ForecastForm {
    pub fn wants_sample(&self) -> bool {
        self.use_sample
            .as_deref()
            .is_some_and(|v| matches!(v.trim().to_lowercase().as_str(), "yes" | "true" | "on" | "1"))
    }

    /// An unparsable seed is ignored and the run is OS-seeded.
    pub fn seed(&self) -> Option<u64> {
        self.seed.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Serialize, JsonSchema)]
pub struct ForecastResponse {
    pub method_name: String,
    pub series_length: usize,
    pub forecast: Forecast,
    /// Histogram chart as a standalone SVG document.
    pub chart_svg: String,
}
