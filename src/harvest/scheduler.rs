//! Batch scheduler: the fan-out/fan-in loop of a harvest run
//!
//! This module handles:
//! - Slicing the candidate sequence into fixed-size batches
//! - Bounding in-flight fetches with a run-wide semaphore
//! - Draining each batch completely before moving on
//! - Merging results into the aggregate from the coordinating task only
//! - Checkpointing the full aggregate after every batch

use crate::harvest::extractor::extract_emails;
use crate::harvest::fetcher::PageFetcher;
use crate::harvest::outcome::{
    CandidateTarget, FetchOutcome, OutcomeKind, PageFetch, RequestErrorKind,
};
use crate::harvest::report::{BatchReport, RunReport};
use crate::output::CheckpointWriter;
use crate::state::{OriginAggregate, RunPhase};
use crate::HarvestError;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Scheduler drives a run through its batches
///
/// The aggregate and the processed set are owned here and only touched by the
/// task calling [`BatchScheduler::run`]; worker tasks hand back a
/// [`FetchOutcome`] and never see shared state.
pub struct BatchScheduler {
    /// Page source shared with worker tasks
    fetcher: Arc<dyn PageFetcher>,

    /// Run-wide pool limiting concurrent fetches
    pool: Arc<Semaphore>,

    batch_size: usize,

    /// URLs already dispatched in this run
    processed: HashSet<String>,

    aggregate: OriginAggregate,

    phase: RunPhase,
}

impl BatchScheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Page source used by every unit
    /// * `batch_size` - Candidates per batch (at least 1)
    /// * `max_workers` - Maximum concurrent fetches (at least 1)
    pub fn new(fetcher: Arc<dyn PageFetcher>, batch_size: usize, max_workers: usize) -> Self {
        Self {
            fetcher,
            pool: Arc::new(Semaphore::new(max_workers.max(1))),
            batch_size: batch_size.max(1),
            processed: HashSet::new(),
            aggregate: OriginAggregate::new(),
            phase: RunPhase::Idle,
        }
    }

    /// Number of batches a candidate list of `total` entries splits into
    pub fn batch_count(&self, total: usize) -> usize {
        total.div_ceil(self.batch_size)
    }

    /// Runs every batch to completion, checkpointing after each
    ///
    /// Per-unit failures never end the run; only a failed checkpoint write
    /// does. An empty candidate list still writes one (empty) checkpoint.
    pub async fn run(
        &mut self,
        candidates: Vec<CandidateTarget>,
        sink: &mut dyn CheckpointWriter,
    ) -> Result<RunReport, HarvestError> {
        let total_batches = self.batch_count(candidates.len());
        let mut report = RunReport::new(candidates.len());

        tracing::info!(
            "Total number of batches to process: {} ({} candidates)",
            total_batches,
            candidates.len()
        );

        if candidates.is_empty() {
            self.checkpoint(sink)?;
        }

        for (index, batch) in candidates.chunks(self.batch_size).enumerate() {
            let batch_number = index + 1;
            let batch_start = Instant::now();

            let mut batch_report = self.run_batch(batch_number, batch.to_vec()).await?;
            self.checkpoint(sink)?;
            batch_report.elapsed = batch_start.elapsed();

            tracing::info!(
                "Batch {}/{} processed {} URLs ({} fetched) in {:.2} seconds, {} new addresses ({} with addresses, {} empty, {} non-2xx, {} failed, {} duplicate)",
                batch_number,
                total_batches,
                batch_report.size,
                batch_report.dispatched,
                batch_report.elapsed.as_secs_f64(),
                batch_report.new_emails,
                batch_report.counts.harvested,
                batch_report.counts.empty,
                batch_report.counts.non_success,
                batch_report.counts.network_failures,
                batch_report.counts.duplicates,
            );

            report.absorb(&batch_report);
        }

        self.transition(RunPhase::Done)?;
        report.finish(self.aggregate.origin_count(), self.aggregate.email_count());

        Ok(report)
    }

    /// Dispatches one batch and blocks until every unit has completed
    async fn run_batch(
        &mut self,
        batch_number: usize,
        batch: Vec<CandidateTarget>,
    ) -> Result<BatchReport, HarvestError> {
        self.transition(RunPhase::BatchRunning)?;

        let mut report = BatchReport::new(batch_number, batch.len());
        let mut units = JoinSet::new();

        for target in batch {
            if !self.processed.insert(target.full_url.clone()) {
                tracing::debug!("Skipping duplicate target {}", target.full_url);
                report.counts.record(OutcomeKind::DuplicateTarget);
                continue;
            }

            units.spawn(harvest_target(
                Arc::clone(&self.fetcher),
                Arc::clone(&self.pool),
                target,
            ));
            report.dispatched += 1;
        }

        // Completion order, not submission order
        while let Some(joined) = units.join_next().await {
            match joined {
                Ok(outcome) => self.absorb(outcome, &mut report),
                Err(e) => {
                    tracing::error!("Harvest unit in batch {} aborted: {}", batch_number, e);
                    report.counts.aborted += 1;
                }
            }
        }

        Ok(report)
    }

    /// Merges one completed unit into the aggregate
    fn absorb(&mut self, outcome: FetchOutcome, report: &mut BatchReport) {
        tracing::debug!(
            "{} -> {} ({} addresses, {:.4} MB, {:.2}s)",
            outcome.target.full_url,
            outcome.status,
            outcome.emails.len(),
            outcome.megabytes(),
            outcome.elapsed.as_secs_f64()
        );

        let new_emails = self
            .aggregate
            .merge(&outcome.target.origin_id, outcome.emails.iter().cloned());
        report.record_outcome(&outcome, new_emails);
    }

    /// Writes the full aggregate through the sink
    fn checkpoint(&mut self, sink: &mut dyn CheckpointWriter) -> Result<(), HarvestError> {
        self.transition(RunPhase::Checkpointing)?;
        sink.write(&self.aggregate)?;
        Ok(())
    }

    fn transition(&mut self, next: RunPhase) -> Result<(), HarvestError> {
        if !self.phase.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Run phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Addresses discovered so far
    pub fn aggregate(&self) -> &OriginAggregate {
        &self.aggregate
    }

    /// Number of distinct URLs dispatched so far
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Whether `url` has already been dispatched in this run
    pub fn is_processed(&self, url: &str) -> bool {
        self.processed.contains(url)
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }
}

/// One unit of work: fetch under a pool permit, then extract
///
/// The permit is released before extraction so the pool bounds network
/// operations only.
async fn harvest_target(
    fetcher: Arc<dyn PageFetcher>,
    pool: Arc<Semaphore>,
    target: CandidateTarget,
) -> FetchOutcome {
    let page = match pool.acquire_owned().await {
        Ok(_permit) => fetcher.fetch(&target.full_url).await,
        // The pool is never closed while a run is in progress
        Err(_) => PageFetch::failed(RequestErrorKind::Other, Duration::ZERO),
    };

    let emails = match (&page.status, &page.body) {
        (status, Some(body)) if status.is_success() => extract_emails(body),
        _ => BTreeSet::new(),
    };

    FetchOutcome {
        target,
        emails,
        status: page.status,
        bytes_transferred: page.bytes_transferred,
        elapsed: page.elapsed,
    }
}
