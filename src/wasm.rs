use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

use crate::engine::{self, DEFAULT_MAX_SIMULATIONS, EngineError, Forecast, ForecastInput};

/// Seed used when the caller supplies none; browsers have no OS entropy here.
const DEFAULT_SEED: u64 = 42;

/// Forecast from a `{ series, method, nsim, seed }` JSON document.
/// Returns the forecast JSON, or `{ "error": ... }`.
#[wasm_bindgen]
pub fn forecast_json(json: &str) -> String {
    let input: ForecastInput = match serde_json::from_str(json) {
        Ok(i) => i,
        Err(e) => return error_json(format!("JSON parse error: {e}")),
    };
    match run(input) {
        Ok(forecast) => serde_json::to_string(&forecast)
            .unwrap_or_else(|e| error_json(format!("Serialization error: {e}"))),
        Err(e) => error_json(e.to_string()),
    }
}

/// Same as [`forecast_json`] but returns a JS object.
#[wasm_bindgen]
pub fn forecast(input: JsValue) -> Result<JsValue, JsValue> {
    let input: ForecastInput = serde_wasm_bindgen::from_value(input)?;
    let forecast = run(input).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(serde_wasm_bindgen::to_value(&forecast)?)
}

#[wasm_bindgen]
pub fn get_schema() -> String {
    crate::schema::get_schema_json()
}

fn run(input: ForecastInput) -> Result<Forecast, EngineError> {
    let seed = input.seed.unwrap_or(DEFAULT_SEED);
    let (series, request) = input.into_parts()?;
    let request = request.clamped(DEFAULT_MAX_SIMULATIONS);
    let mut rng = StdRng::seed_from_u64(seed);
    engine::forecast(&series, &request, &mut rng)
}

fn error_json(msg: String) -> String {
    serde_json::json!({ "error": msg }).to_string()
}
