pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use state::AppState;

/// Uploaded CSVs larger than this are rejected by the extractor.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub fn router(config: ServerConfig) -> Router {
    let state = AppState::new(config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(|| async { "ok" }))
        // Browser form
        .route(
            "/",
            get(handlers::pages::index).post(handlers::forecast::submit_form),
        )
        // Forecast
        .route("/api/forecast", post(handlers::forecast::upload_forecast))
        .route("/api/forecast/json", post(handlers::forecast::json_forecast))
        // Schema
        .route("/api/schema", get(handlers::schema::get_schema))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(config: ServerConfig) -> Result<()> {
    if !config.sample_csv.exists() {
        warn!(
            path = %config.sample_csv.display(),
            "sample dataset not found; use_sample requests will fail"
        );
    }

    let addr = config.addr();
    let app = router(config);

    info!("mc-forecast listening on {addr}");
    info!("  Form:     GET  http://{addr}/");
    info!("  Forecast: POST http://{addr}/api/forecast");
    info!("  JSON:     POST http://{addr}/api/forecast/json");
    info!("  Schema:   GET  http://{addr}/api/schema");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    axum::serve(listener, app).await.context("running server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;

    const BOUNDARY: &str = "mc-forecast-boundary";

    fn app() -> Router {
        router(ServerConfig {
            sample_csv: concat!(env!("CARGO_MANIFEST_DIR"), "/sample_data/weather.csv").into(),
            ..ServerConfig::default()
        })
    }

    /// `(name, Some(file_name), value)` parts as a multipart body.
    fn multipart(parts: &[(&str, Option<&str>, &str)]) -> Body {
        let mut body = String::new();
        for (name, file_name, value) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match file_name {
                Some(file_name) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: text/csv\r\n\r\n"
                )),
                None => body.push_str(&format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Body::from(body)
    }

    fn post(uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(body)
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_upload_with_sample_flag() {
        let body = multipart(&[
            ("use_sample", None, "yes"),
            ("method", None, "empirical"),
            ("nsim", None, "400"),
            ("seed", None, "9"),
        ]);
        let response = app().oneshot(post("/api/forecast", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["method_name"], "Empirical Bootstrap");
        assert_eq!(json["series_length"], 88);
        assert_eq!(json["forecast"]["simulation_count"], 400);
        assert_eq!(json["forecast"]["method"], "empirical");
    }

    #[tokio::test]
    async fn test_upload_with_csv_file() {
        let body = multipart(&[
            ("file", Some("upload.csv"), "date,temp\n2024-01-01,20.0\n2024-01-02,21.5\n2024-01-03,21.0\n"),
            ("method", None, "parametric"),
            ("nsim", None, "-4"),
        ]);
        let response = app().oneshot(post("/api/forecast", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["method_name"], "Parametric Normal");
        assert_eq!(json["series_length"], 3);
        assert_eq!(json["forecast"]["last_observation"], 21.0);
        assert_eq!(json["forecast"]["simulation_count"], 10_000);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_csv() {
        let body = multipart(&[("file", Some("notes.txt"), "temp\n1.0\n")]);
        let response = app().oneshot(post("/api/forecast", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(json["error"].as_str().unwrap().contains("notes.txt"));
    }

    #[tokio::test]
    async fn test_browser_form_renders_result_page() {
        let body = multipart(&[
            ("use_sample", None, "on"),
            ("method", None, "bootstrap-ish"),
            ("nsim", None, "250"),
        ]);
        let response = app().oneshot(post("/", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_text(response).await;
        assert!(page.contains("<h1>Empirical Bootstrap</h1>"));
        assert!(page.contains("88 observations"));
        assert!(page.contains("250 simulations"));
        assert!(page.contains("<svg"));
    }

    #[tokio::test]
    async fn test_browser_form_error_page() {
        let body = multipart(&[("method", None, "parametric")]);
        let response = app().oneshot(post("/", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("class=\"error\""));
    }

    #[tokio::test]
    async fn test_schema_route() {
        let request = Request::builder().uri("/api/schema").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let text = body_text(response).await;
        assert!(text.contains("standard_deviation"));
        assert!(text.contains("bin_edges"));
    }
}
