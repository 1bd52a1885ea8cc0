//! Minimal HTML for the browser flow: upload form, result page, error page.

use std::fmt::Write as _;

use axum::extract::State;
use axum::response::Html;

use crate::api::state::AppState;
use crate::api::types::ForecastResponse;

const STYLE: &str = "body{font-family:sans-serif;max-width:860px;margin:2rem auto;padding:0 1rem}\
table{border-collapse:collapse}td,th{padding:.25rem .75rem;border-bottom:1px solid #ddd;text-align:right}\
th{text-align:left}.error{color:#b00020}";

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(index_page(state.config.default_simulations, &state.config.value_column))
}

pub fn index_page(default_simulations: usize, column: &str) -> String {
    let body = format!(
        r#"<h1>Monte Carlo Forecast</h1>
<p>Upload a CSV with a <code>{column}</code> column, or use the bundled sample.</p>
<form method="post" action="/" enctype="multipart/form-data">
  <p><input type="file" name="file" accept=".csv"></p>
  <p><label><input type="checkbox" name="use_sample" value="yes"> Use sample data</label></p>
  <p><label>Method
    <select name="method">
      <option value="parametric">Parametric Normal</option>
      <option value="empirical">Empirical Bootstrap</option>
    </select></label></p>
  <p><label>Simulations <input type="number" name="nsim" value="{default_simulations}" min="1"></label></p>
  <p><label>Seed (optional) <input type="number" name="seed" min="0"></label></p>
  <p><button type="submit">Run</button></p>
</form>"#,
        column = escape_html(column),
    );
    layout("Monte Carlo Forecast", &body)
}

pub fn result_page(response: &ForecastResponse) -> String {
    let s = &response.forecast.statistics;
    let mut rows = String::new();
    for (label, value) in [
        ("Mean", s.mean),
        ("Median", s.median),
        ("P10", s.p10),
        ("P25", s.p25),
        ("P75", s.p75),
        ("P90", s.p90),
    ] {
        let _ = write!(rows, "<tr><th>{label}</th><td>{value:.4}</td></tr>");
    }
    let std = s
        .standard_deviation
        .map(|v| format!("{v:.4}"))
        .unwrap_or_else(|| "undefined".to_string());
    let _ = write!(rows, "<tr><th>Std</th><td>{std}</td></tr>");

    let body = format!(
        r#"<h1>{method}</h1>
<p>{n} observations, last value {last:.4}, {sims} simulations.</p>
<table>{rows}</table>
<div>{chart}</div>
<p><a href="/">New forecast</a></p>"#,
        method = escape_html(&response.method_name),
        n = response.series_length,
        last = response.forecast.last_observation,
        sims = response.forecast.simulation_count,
        chart = response.chart_svg,
    );
    layout(&response.method_name, &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"<p class="error">{}</p><p><a href="/">Back</a></p>"#,
        escape_html(message)
    );
    layout("Forecast failed", &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{STYLE}</style></head><body>{body}</body></html>",
        escape_html(title)
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
