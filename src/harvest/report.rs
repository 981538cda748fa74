//! Per-batch and per-run progress reports

use crate::harvest::outcome::{FetchOutcome, OutcomeKind};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Unit counts by outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub harvested: u64,
    pub empty: u64,
    pub non_success: u64,
    pub network_failures: u64,
    pub duplicates: u64,
    /// Units whose task panicked; nothing was merged for them
    pub aborted: u64,
}

impl OutcomeCounts {
    pub fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Harvested => self.harvested += 1,
            OutcomeKind::ExtractionYieldsNothing => self.empty += 1,
            OutcomeKind::NonSuccessStatus => self.non_success += 1,
            OutcomeKind::NetworkFailure => self.network_failures += 1,
            OutcomeKind::DuplicateTarget => self.duplicates += 1,
        }
    }

    /// Units that were dispatched and completed, whatever their result
    pub fn completed(&self) -> u64 {
        self.harvested + self.empty + self.non_success + self.network_failures
    }

    fn add(&mut self, other: &OutcomeCounts) {
        self.harvested += other.harvested;
        self.empty += other.empty;
        self.non_success += other.non_success;
        self.network_failures += other.network_failures;
        self.duplicates += other.duplicates;
        self.aborted += other.aborted;
    }
}

/// What happened in one drained batch
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// 1-based batch number
    pub batch_number: usize,

    /// Candidates in the batch slice, duplicates included
    pub size: usize,

    /// Units actually dispatched to the pool
    pub dispatched: usize,

    pub counts: OutcomeCounts,

    /// Addresses that were new for their origin
    pub new_emails: usize,

    pub bytes_transferred: u64,

    /// Wall-clock time from dispatch to checkpoint written
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn new(batch_number: usize, size: usize) -> Self {
        Self {
            batch_number,
            size,
            ..Self::default()
        }
    }

    /// Accounts for one completed unit
    pub fn record_outcome(&mut self, outcome: &FetchOutcome, new_emails: usize) {
        self.counts.record(outcome.kind());
        self.bytes_transferred += outcome.bytes_transferred;
        self.new_emails += new_emails;
    }
}

/// Summary of a whole run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub total_candidates: usize,
    pub batches: usize,

    /// Units dispatched to the pool across all batches
    pub dispatched: usize,

    pub counts: OutcomeCounts,

    /// Sum of per-batch new addresses; equals `emails` once finished
    pub new_emails: usize,

    pub bytes_transferred: u64,

    /// Origins with at least one address at the end of the run
    pub origins: usize,

    /// Total addresses at the end of the run
    pub emails: usize,
}

impl RunReport {
    pub fn new(total_candidates: usize) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            total_candidates,
            batches: 0,
            dispatched: 0,
            counts: OutcomeCounts::default(),
            new_emails: 0,
            bytes_transferred: 0,
            origins: 0,
            emails: 0,
        }
    }

    pub fn absorb(&mut self, batch: &BatchReport) {
        self.batches += 1;
        self.dispatched += batch.dispatched;
        self.counts.add(&batch.counts);
        self.new_emails += batch.new_emails;
        self.bytes_transferred += batch.bytes_transferred;
    }

    pub fn finish(&mut self, origins: usize, emails: usize) {
        self.origins = origins;
        self.emails = emails;
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, if finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    pub fn megabytes(&self) -> f64 {
        self.bytes_transferred as f64 / (1024.0 * 1024.0)
    }
}
