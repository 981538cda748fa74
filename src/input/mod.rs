//! Input loading for Contact-Harvest
//!
//! Reads the origin list and the route catalog from CSV files and expands them
//! into the ordered candidate sequence the harvester consumes.

mod candidates;

pub use candidates::expand_candidates;

use crate::InputError;
use std::path::Path;

/// Header of the origins column
pub const ORIGIN_COLUMN: &str = "URL";

/// Header of the routes column
pub const ROUTE_COLUMN: &str = "Route";

/// Loads the list of origins from a CSV file with a `URL` column
pub fn load_origins(path: &Path) -> Result<Vec<String>, InputError> {
    load_column(path, ORIGIN_COLUMN)
}

/// Loads the route catalog from a CSV file with a `Route` column
pub fn load_routes(path: &Path) -> Result<Vec<String>, InputError> {
    load_column(path, ROUTE_COLUMN)
}

/// Reads one named column from a headed CSV file
///
/// Values are trimmed; blank values are skipped. Row order is preserved.
fn load_column(path: &Path, column: &str) -> Result<Vec<String>, InputError> {
    let csv_error = |source: csv::Error| InputError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let index = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .position(|header| header.trim() == column)
        .ok_or_else(|| InputError::MissingColumn {
            path: path.display().to_string(),
            column: column.to_string(),
        })?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if let Some(value) = record.get(index).map(str::trim) {
            if !value.is_empty() {
                values.push(value.to_string());
            }
        }
    }

    tracing::debug!("Loaded {} values from {}", values.len(), path.display());
    Ok(values)
}
