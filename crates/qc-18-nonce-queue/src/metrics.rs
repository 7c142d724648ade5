//! Reconciler counters.

use crate::domain::{FetchMode, ReconcileReport, RunOutcome};
use std::sync::atomic::{AtomicU64, Ordering};

/// Cumulative counters across reconciler runs.
#[derive(Debug, Default)]
pub struct ReconcileStats {
    /// Runs started
    pub runs: AtomicU64,
    /// Operations accepted into the queue
    pub enqueued: AtomicU64,
    /// Entries dropped by the retention window
    pub evicted: AtomicU64,
    /// Operations accepted downstream
    pub resubmitted: AtomicU64,
    /// Operations rejected downstream
    pub rejected: AtomicU64,
    /// Entry reads that failed and were deferred
    pub deferred: AtomicU64,
    /// Runs that fell back to per-entry reads
    pub fallbacks: AtomicU64,
    /// Runs aborted on result-count mismatch
    pub aborted_runs: AtomicU64,
}

impl ReconcileStats {
    /// Folds a finished run into the counters.
    pub fn record(&self, report: &ReconcileReport) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.evicted
            .fetch_add(report.evicted as u64, Ordering::Relaxed);
        self.resubmitted
            .fetch_add(report.resubmitted as u64, Ordering::Relaxed);
        self.rejected
            .fetch_add(report.rejected as u64, Ordering::Relaxed);
        self.deferred
            .fetch_add(report.deferred as u64, Ordering::Relaxed);
        if report.fetch_mode == Some(FetchMode::PerEntry) {
            self.fallbacks.fetch_add(1, Ordering::Relaxed);
        }
        if matches!(report.outcome, RunOutcome::Aborted { .. }) {
            self.aborted_runs.fetch_add(1, Ordering::Relaxed);
        }
    }
}
