use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::response::{Html, IntoResponse, Response};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use super::pages;
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::{ForecastForm, ForecastResponse};
use crate::config::ServerConfig;
use crate::data::SeriesSource;
use crate::engine::{self, ForecastInput, Series, SimulationRequest};
use crate::render;

/// `POST /api/forecast`: multipart upload, JSON result.
pub async fn upload_forecast(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ForecastResponse>, ApiError> {
    let form = read_form(multipart).await?;
    let response = forecast_from_form(state.config.clone(), form).await?;
    Ok(Json(response))
}

/// `POST /`: the browser form, rendered as a result page.
pub async fn submit_form(State(state): State<AppState>, multipart: Multipart) -> Response {
    let result = match read_form(multipart).await {
        Ok(form) => forecast_from_form(state.config.clone(), form).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(response) => Html(pages::result_page(&response)).into_response(),
        Err(e) => {
            warn!(error = e.message(), "form forecast rejected");
            e.into_html_response()
        }
    }
}

/// `POST /api/forecast/json`: series supplied inline.
pub async fn json_forecast(
    State(state): State<AppState>,
    Json(input): Json<ForecastInput>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let seed = input.seed;
    let (series, request) = input.into_parts()?;
    let request = request.clamped(state.config.max_simulations);

    let response = tokio::task::spawn_blocking(move || run_forecast(&series, &request, seed))
        .await
        .map_err(|e| ApiError::Internal(format!("task join error: {e}")))??;
    Ok(Json(response))
}

async fn read_form(mut multipart: Multipart) -> Result<ForecastForm, ApiError> {
    let mut form = ForecastForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("reading field: {e}")))?;
            form.file = Some((file_name, bytes.to_vec()));
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(format!("reading field '{name}': {e}")))?;
        match name.as_str() {
            "method" => form.method = Some(text),
            "nsim" => form.nsim = Some(text),
            "use_sample" => form.use_sample = Some(text),
            "seed" => form.seed = Some(text),
            _ => {}
        }
    }

    Ok(form)
}

async fn forecast_from_form(
    config: Arc<ServerConfig>,
    form: ForecastForm,
) -> Result<ForecastResponse, ApiError> {
    let request = SimulationRequest::from_form(
        form.method.as_deref().unwrap_or("parametric"),
        form.nsim.as_deref(),
    )
    .clamped(config.max_simulations);
    let seed = form.seed();

    tokio::task::spawn_blocking(move || {
        let series = load_form_series(&config, &form)?;
        run_forecast(&series, &request, seed)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("task join error: {e}")))?
}

fn load_form_series(config: &ServerConfig, form: &ForecastForm) -> Result<Series, ApiError> {
    let source = if form.wants_sample() {
        SeriesSource::Sample(&config.sample_csv)
    } else {
        let (file_name, bytes) = form.file.as_ref().ok_or_else(|| {
            ApiError::BadRequest(
                "form did not include a file. Send multipart/form-data with a 'file' field".into(),
            )
        })?;
        if file_name.is_empty() {
            return Err(ApiError::BadRequest(
                "empty file name. Choose a CSV file".into(),
            ));
        }
        SeriesSource::Upload { file_name, bytes }
    };
    Ok(source.load(&config.value_column)?)
}

/// Run the engine with a per-request RNG and render the chart.
pub fn run_forecast(
    series: &Series,
    request: &SimulationRequest,
    seed: Option<u64>,
) -> Result<ForecastResponse, ApiError> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let started = Instant::now();
    let forecast = engine::forecast(series, request, &mut rng)?;
    info!(
        observations = series.len(),
        method = %request.method,
        simulations = request.simulation_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "forecast complete"
    );

    let chart_svg = render::render_svg(&forecast.histogram, &render::chart_title(forecast.method));
    Ok(ForecastResponse {
        method_name: forecast.method.display_name().to_string(),
        series_length: series.len(),
        forecast,
        chart_svg,
    })
}
