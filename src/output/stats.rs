//! Statistics over an existing checkpoint
//!
//! Backs the `--stats` mode: reads whatever snapshot is on disk and
//! summarizes it without touching the network.

use crate::config::{OutputConfig, OutputFormat};
use crate::output::csv_checkpoint::read_csv_rows;
use crate::output::sqlite_checkpoint::read_sqlite_rows;
use crate::output::traits::OutputResult;
use std::path::Path;

/// How many origins are listed in the top-origins table
const TOP_ORIGINS: usize = 10;

/// Checkpoint statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckpointStatistics {
    /// Number of origins with at least one address
    pub origins: u64,

    /// Total addresses across all origins
    pub emails: u64,

    /// Origins with the most addresses, descending
    pub top_origins: Vec<(String, u64)>,
}

impl CheckpointStatistics {
    /// Average number of addresses per listed origin
    pub fn emails_per_origin(&self) -> f64 {
        if self.origins == 0 {
            return 0.0;
        }
        self.emails as f64 / self.origins as f64
    }

    fn from_rows(rows: Vec<(String, Vec<String>)>) -> Self {
        let mut counts: Vec<(String, u64)> = rows
            .into_iter()
            .map(|(origin, emails)| (origin, emails.len() as u64))
            .collect();

        let origins = counts.len() as u64;
        let emails = counts.iter().map(|(_, n)| n).sum::<u64>();

        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(TOP_ORIGINS);

        Self {
            origins,
            emails,
            top_origins: counts,
        }
    }
}

/// Loads statistics from the checkpoint named in the output configuration
pub fn load_statistics(config: &OutputConfig) -> OutputResult<CheckpointStatistics> {
    let path = Path::new(&config.checkpoint_path);
    let rows = match config.format {
        OutputFormat::Csv => read_csv_rows(path)?,
        OutputFormat::Sqlite => read_sqlite_rows(path)?,
    };
    Ok(CheckpointStatistics::from_rows(rows))
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CheckpointStatistics) {
    println!("=== Checkpoint Statistics ===\n");

    println!("Overview:");
    println!("  Origins with addresses: {}", stats.origins);
    println!("  Addresses found: {}", stats.emails);
    println!("  Addresses per origin: {:.2}", stats.emails_per_origin());
    println!();

    if !stats.top_origins.is_empty() {
        println!("Top Origins ({}):", stats.top_origins.len());
        for (origin, count) in &stats.top_origins {
            println!("  - {} ({})", origin, count);
        }
    }
}
