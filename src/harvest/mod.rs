//! Harvest module for Contact-Harvest
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching behind the [`PageFetcher`] seam
//! - Email extraction from HTML
//! - Batch scheduling with a bounded worker pool
//! - Run coordination and reporting

mod coordinator;
mod extractor;
mod fetcher;
mod outcome;
mod report;
mod scheduler;

pub use coordinator::{load_candidates, run_harvest, Coordinator};
pub use extractor::{clean_email, extract_emails};
pub use fetcher::{build_http_client, fetch_page, HttpFetcher, PageFetcher};
pub use outcome::{
    CandidateTarget, FetchOutcome, FetchStatus, OutcomeKind, PageFetch, RequestErrorKind,
};
pub use report::{BatchReport, OutcomeCounts, RunReport};
pub use scheduler::BatchScheduler;
