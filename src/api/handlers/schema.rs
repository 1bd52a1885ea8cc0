use axum::Json;
use schemars::{Schema, schema_for};

use crate::engine::Forecast;

/// `GET /api/schema`: JSON Schema of the forecast payload.
pub async fn get_schema() -> Json<Schema> {
    Json(schema_for!(Forecast))
}
