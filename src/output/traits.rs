//! Checkpoint writer trait and output error types

use crate::state::OriginAggregate;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Malformed checkpoint {path}: {message}")]
    Malformed { path: String, message: String },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Durable sink for aggregate snapshots
///
/// Every call replaces the previous snapshot with the complete aggregate; a
/// reader never observes a partially written snapshot. Writing the same
/// aggregate twice leaves identical content.
pub trait CheckpointWriter: Send {
    /// Replaces the stored snapshot with `aggregate`
    fn write(&mut self, aggregate: &OriginAggregate) -> OutputResult<()>;

    /// Where snapshots are written
    fn location(&self) -> &Path;
}
