//! Contact-Harvest: a batched contact-address harvester
//!
//! This crate probes a list of websites (each origin's home page plus a catalog of
//! common subpaths), extracts published email addresses, and aggregates them per
//! origin, checkpointing the full result after every batch.

pub mod config;
pub mod harvest;
pub mod input;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Contact-Harvest operations
///
/// Per-page failures never surface here; they are captured in
/// [`harvest::FetchOutcome`]. These are the conditions that stop a run.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid run transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunPhase,
        to: state::RunPhase,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors reading the origin and route lists
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { path: String, column: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Contact-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{CandidateTarget, FetchOutcome, FetchStatus};
pub use state::{OriginAggregate, RunPhase};
pub use url::normalize_origin;
