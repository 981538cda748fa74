//! Output module for checkpointing harvest results
//!
//! This module handles:
//! - Writing full aggregate snapshots after every batch (CSV or SQLite)
//! - Reading snapshots back for statistics

mod csv_checkpoint;
mod sqlite_checkpoint;
pub mod stats;
mod traits;

pub use csv_checkpoint::{read_csv_rows, render_csv, CsvCheckpoint, CSV_HEADER};
pub use sqlite_checkpoint::{read_sqlite_rows, SqliteCheckpoint};
pub use stats::{load_statistics, print_statistics, CheckpointStatistics};
pub use traits::{CheckpointWriter, OutputError, OutputResult};

use crate::config::{OutputConfig, OutputFormat};
use std::path::Path;

/// Opens the configured checkpoint sink for a new run
///
/// A snapshot left over from an earlier run is removed first, so the file on
/// disk only ever reflects the current run. Missing parent directories are
/// created, and a destination that cannot be written fails here, before any
/// page is fetched.
pub fn open_checkpoint(config: &OutputConfig) -> OutputResult<Box<dyn CheckpointWriter>> {
    let path = Path::new(&config.checkpoint_path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    if path.exists() {
        tracing::info!("Removing previous checkpoint at {}", path.display());
        std::fs::remove_file(path)?;
    }

    let sink: Box<dyn CheckpointWriter> = match config.format {
        OutputFormat::Csv => Box::new(CsvCheckpoint::open(path)?),
        OutputFormat::Sqlite => Box::new(SqliteCheckpoint::open(path)?),
    };

    Ok(sink)
}
