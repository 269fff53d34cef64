//! Run summary and reporting

use super::day::{DayOutcome, DayResult};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

/// A day that was given up on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbandonedDay {
    pub day: NaiveDate,
    pub page: u32,
    pub reason: String,
    /// Records from earlier pages that were still kept
    pub kept_records: usize,
}

/// Summary of a collection run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Records recovered from the checkpoint at startup
    pub initial_records: usize,

    /// Records held when the run ended
    pub total_records: usize,

    /// First day actually fetched (None if the range was already covered)
    pub first_day: Option<NaiveDate>,

    /// Days fetched to completion or abandonment
    pub days_processed: usize,

    /// Days that yielded at least one record
    pub days_with_records: usize,

    /// Days skipped after exhausting retries
    pub abandoned_days: Vec<AbandonedDay>,

    /// HTTP requests issued
    pub requests: u64,

    /// Requests that failed
    pub failed_requests: u64,

    /// Number of checkpoint writes
    pub checkpoints_written: usize,

    /// Final output location, once written
    pub output_path: Option<PathBuf>,

    /// Whether the run stopped on a shutdown signal
    pub interrupted: bool,

    /// Unclassified failure that ended the run
    pub fatal_error: Option<String>,

    /// Wall-clock duration
    pub duration: Duration,
}

impl RunSummary {
    pub fn new(initial_records: usize) -> Self {
        Self {
            initial_records,
            total_records: initial_records,
            ..Default::default()
        }
    }

    /// Accounts for one finished (or interrupted) day
    pub fn record_day(&mut self, result: &DayResult) {
        self.requests += u64::from(result.requests);
        self.failed_requests += u64::from(result.failures);

        match &result.outcome {
            DayOutcome::Interrupted => return,
            DayOutcome::Abandoned { page, reason } => {
                self.abandoned_days.push(AbandonedDay {
                    day: result.day,
                    page: *page,
                    reason: reason.clone(),
                    kept_records: result.records.len(),
                });
            }
            DayOutcome::Complete => {}
        }

        self.days_processed += 1;
        if !result.records.is_empty() {
            self.days_with_records += 1;
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Records added by this run
    pub fn new_records(&self) -> usize {
        self.total_records.saturating_sub(self.initial_records)
    }

    /// Whether every day in the range completed and the output was written
    pub fn is_successful(&self) -> bool {
        !self.interrupted
            && self.fatal_error.is_none()
            && self.abandoned_days.is_empty()
            && self.output_path.is_some()
    }

    /// Process exit code for this outcome
    ///
    /// `130` interrupted, `5` fatal, `1` completed with abandoned days, `0` success.
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            130
        } else if self.fatal_error.is_some() {
            5
        } else if !self.abandoned_days.is_empty() {
            1
        } else {
            0
        }
    }

    /// Run duration in whole milliseconds, saturating at `u64::MAX`
    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }

    /// Emits the summary as a structured log event
    pub fn log_summary(&self) {
        tracing::info!(
            initial_records = self.initial_records,
            total_records = self.total_records,
            new_records = self.new_records(),
            days_processed = self.days_processed,
            days_with_records = self.days_with_records,
            abandoned_days = self.abandoned_days.len(),
            requests = self.requests,
            failed_requests = self.failed_requests,
            checkpoints_written = self.checkpoints_written,
            interrupted = self.interrupted,
            duration_ms = self.duration_ms(),
            "Collection run finished"
        );
    }
}
