use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;

use crate::data::DataError;
use crate::engine::EngineError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
        }
    }

    /// Same error as an HTML page, for the browser form.
    pub fn into_html_response(self) -> Response {
        let page = super::handlers::pages::error_page(self.message());
        (self.status(), Html(page)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "error": self.message() });
        (status, axum::Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        if err.is_invalid_input() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Engine(e) => e.into(),
            DataError::Io(_) | DataError::SampleMissing { .. } => ApiError::Internal(err.to_string()),
            DataError::Csv(_)
            | DataError::MissingColumn { .. }
            | DataError::NotNumeric { .. }
            | DataError::NoValues { .. }
            | DataError::NotCsv { .. } => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}
