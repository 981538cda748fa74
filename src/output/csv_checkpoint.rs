//! CSV checkpoint sink
//!
//! Snapshots are rendered in memory, written to a temporary file next to the
//! destination and renamed over it, so the destination always holds one
//! complete table.

use crate::output::traits::{CheckpointWriter, OutputError, OutputResult};
use crate::state::OriginAggregate;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Header row of the checkpoint table
pub const CSV_HEADER: [&str; 2] = ["URL", "Emails"];

/// Writes the aggregate as a two-column CSV table
#[derive(Debug, Clone)]
pub struct CsvCheckpoint {
    path: PathBuf,
}

impl CsvCheckpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the sink after checking that its directory accepts temp files
    ///
    /// An unwritable destination fails here rather than at the first
    /// checkpoint, after a batch of fetches.
    pub fn open(path: impl Into<PathBuf>) -> OutputResult<Self> {
        let sink = Self::new(path);
        NamedTempFile::new_in(sink.staging_dir())?;
        Ok(sink)
    }

    /// Directory holding temp files before they are renamed into place
    fn staging_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl CheckpointWriter for CsvCheckpoint {
    fn write(&mut self, aggregate: &OriginAggregate) -> OutputResult<()> {
        let content = render_csv(aggregate)?;

        let mut temp = NamedTempFile::new_in(self.staging_dir())?;
        temp.write_all(&content)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(
            "Checkpoint written to {} ({} origins)",
            self.path.display(),
            aggregate.origin_count()
        );
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Renders the snapshot exactly as it is written to disk
///
/// Rows are ordered by origin; each email list is sorted and `", "`-joined.
pub fn render_csv(aggregate: &OriginAggregate) -> OutputResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for (origin, emails) in aggregate.rows() {
        writer.write_record([origin.as_str(), emails.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| OutputError::Io(e.into_error()))
}

/// Reads a CSV checkpoint back as `(origin, emails)` rows
pub fn read_csv_rows(path: &Path) -> OutputResult<Vec<(String, Vec<String>)>> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    if headers.iter().collect::<Vec<_>>() != CSV_HEADER {
        return Err(OutputError::Malformed {
            path: path.display().to_string(),
            message: format!("unexpected header {:?}", headers),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let origin = record.get(0).unwrap_or_default().to_string();
        let emails = split_emails(record.get(1).unwrap_or_default());
        rows.push((origin, emails));
    }

    Ok(rows)
}

/// Splits a rendered email list back into addresses
pub fn split_emails(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .collect()
}
