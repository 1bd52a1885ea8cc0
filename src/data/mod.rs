use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::engine::{EngineError, Series};

/// Column read when none is configured.
pub const DEFAULT_COLUMN: &str = "temp";

/// Bundled sample dataset, relative to the working directory.
pub const SAMPLE_CSV: &str = "sample_data/weather.csv";

const MISSING_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null", "none"];

#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV must have a '{column}' column (case-sensitive)")]
    MissingColumn { column: String },

    #[error("row {row}: '{value}' is not a number")]
    NotNumeric { row: usize, value: String },

    #[error("CSV has no valid values in column '{column}'")]
    NoValues { column: String },

    #[error("file type not allowed: '{name}'. Use a .csv file")]
    NotCsv { name: String },

    #[error("sample dataset not found at {}", .path.display())]
    SampleMissing { path: PathBuf },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Where the series comes from: an uploaded file or the bundled sample.
pub enum SeriesSource<'a> {
    Upload { file_name: &'a str, bytes: &'a [u8] },
    Sample(&'a Path),
}

impl SeriesSource<'_> {
    pub fn load(&self, column: &str) -> Result<Series, DataError> {
        match self {
            SeriesSource::Upload { file_name, bytes } => {
                if !is_allowed_file(file_name) {
                    return Err(DataError::NotCsv {
                        name: file_name.to_string(),
                    });
                }
                load_series(*bytes, column)
            }
            SeriesSource::Sample(path) => {
                if !path.exists() {
                    return Err(DataError::SampleMissing {
                        path: path.to_path_buf(),
                    });
                }
                load_series_from_path(path, column)
            }
        }
    }
}

/// Only `.csv` uploads are accepted.
pub fn is_allowed_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case("csv"))
}

/// Read one numeric column from a CSV with headers.
///
/// Missing cells are dropped; any other non-numeric text is an error.
pub fn load_series<R: Read>(reader: R, column: &str) -> Result<Series, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let col_idx = rdr
        .headers()?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| DataError::MissingColumn {
            column: column.to_string(),
        })?;

    let mut values = Vec::new();
    let mut dropped = 0usize;
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let raw = record.get(col_idx).unwrap_or("");
        if MISSING_MARKERS.contains(&raw.to_ascii_lowercase().as_str()) {
            dropped += 1;
            continue;
        }
        let value: f64 = raw.parse().map_err(|_| DataError::NotNumeric {
            row: i + 1,
            value: raw.to_string(),
        })?;
        if value.is_finite() {
            values.push(value);
        } else {
            dropped += 1;
        }
    }

    debug!(column, kept = values.len(), dropped, "loaded series");

    if values.is_empty() {
        return Err(DataError::NoValues {
            column: column.to_string(),
        });
    }
    Ok(Series::new(values)?)
}

pub fn load_series_from_path(path: &Path, column: &str) -> Result<Series, DataError> {
    let file = std::fs::File::open(path)?;
    load_series(file, column)
}
