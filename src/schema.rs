use schemars::schema_for;

use crate::engine::Forecast;

/// JSON Schema for `Forecast`, pretty-printed.
pub fn get_schema_json() -> String {
    let schema = schema_for!(Forecast);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|e| {
        serde_json::json!({ "error": format!("Serialization error: {e}") }).to_string()
    })
}

/// Print the JSON Schema for `Forecast`.
pub fn run() -> anyhow::Result<()> {
    println!("{}", get_schema_json());
    Ok(())
}
