//! Harvest coordinator - wires configuration, input, fetcher and sink together
//!
//! This module contains the entry point of a run:
//! - Loading the origin list and route catalog
//! - Expanding them into the candidate sequence
//! - Building the HTTP fetcher and opening the checkpoint sink
//! - Driving the batch scheduler and logging the final report

use crate::config::Config;
use crate::harvest::fetcher::{HttpFetcher, PageFetcher};
use crate::harvest::outcome::CandidateTarget;
use crate::harvest::report::RunReport;
use crate::harvest::scheduler::BatchScheduler;
use crate::input::{expand_candidates, load_origins, load_routes};
use crate::output::{open_checkpoint, CheckpointWriter};
use crate::state::OriginAggregate;
use crate::Result;
use std::path::Path;
use std::sync::Arc;

/// Main harvest coordinator structure
pub struct Coordinator {
    scheduler: BatchScheduler,
    sink: Box<dyn CheckpointWriter>,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Client built and checkpoint sink opened
    /// * `Err(HarvestError)` - Failed to initialize
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.http)?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Creates a coordinator around an arbitrary page source
    pub fn with_fetcher(
        config: &Config,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self> {
        let sink = open_checkpoint(&config.output)?;
        let scheduler = BatchScheduler::new(
            fetcher,
            config.harvest.batch_size,
            config.harvest.max_workers,
        );

        Ok(Self { scheduler, sink })
    }

    /// Runs the harvest over `candidates`
    pub async fn run(&mut self, candidates: Vec<CandidateTarget>) -> Result<RunReport> {
        tracing::info!(
            "Checkpointing to {} after every batch",
            self.sink.location().display()
        );

        let report = self.scheduler.run(candidates, self.sink.as_mut()).await?;
        log_report(&report);

        Ok(report)
    }

    /// Addresses discovered so far
    pub fn aggregate(&self) -> &OriginAggregate {
        self.scheduler.aggregate()
    }
}

/// Loads both input lists and expands them into the candidate sequence
pub fn load_candidates(config: &Config) -> Result<Vec<CandidateTarget>> {
    let origins = load_origins(Path::new(&config.input.origins_path))?;
    let routes = load_routes(Path::new(&config.input.routes_path))?;

    tracing::info!(
        "Loaded {} origins and {} routes",
        origins.len(),
        routes.len()
    );

    Ok(expand_candidates(&origins, &routes))
}

/// Main entry point for a harvest run
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(RunReport)` - Every batch completed and was checkpointed
/// * `Err(HarvestError)` - Input could not be read or a checkpoint failed
pub async fn run_harvest(config: &Config) -> Result<RunReport> {
    let candidates = load_candidates(config)?;
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run(candidates).await
}

fn log_report(report: &RunReport) {
    tracing::info!("=== Harvest Complete ===");
    tracing::info!(
        "Candidates: {}, fetched: {}, batches: {}",
        report.total_candidates,
        report.dispatched,
        report.batches
    );
    tracing::info!(
        "Harvested: {}, empty: {}, non-2xx: {}, failed: {}, duplicate: {}",
        report.counts.harvested,
        report.counts.empty,
        report.counts.non_success,
        report.counts.network_failures,
        report.counts.duplicates
    );
    if report.counts.aborted > 0 {
        tracing::warn!("Aborted units: {}", report.counts.aborted);
    }
    tracing::info!(
        "Origins with addresses: {}, addresses: {}",
        report.origins,
        report.emails
    );
    tracing::info!(
        "Transferred {:.2} MB in {:.2} seconds",
        report.megabytes(),
        report.duration_seconds().unwrap_or_default()
    );
}
