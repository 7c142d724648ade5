//! Value objects exchanged between the reconciler, the ledger port and callers.

use super::entities::{Address, U256};
use crate::error::NonceQueueError;

/// One on-chain nonce lookup: `entry_point.getNonce(sender, key)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NonceQuery {
    /// Entry point contract to query.
    pub entry_point: Address,
    /// Account whose nonce is read.
    pub sender: Address,
    /// Nonce key (namespace).
    pub key: U256,
}

/// Per-query result of a nonce read: the full on-chain nonce or the failure.
pub type NonceReadOutcome = Result<U256, NonceQueueError>;

/// Which read strategy produced the results of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchMode {
    /// Single aggregated call succeeded.
    Batched,
    /// Aggregated call failed; one call per query.
    PerEntry,
}

/// How a reconciler run ended.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum RunOutcome {
    /// Store empty after eviction, no read issued.
    #[default]
    Idle,
    /// Reads resolved and decisions applied.
    Completed,
    /// Result count did not match; nothing applied.
    Aborted {
        /// Queries issued.
        expected: usize,
        /// Results returned.
        actual: usize,
    },
}

impl RunOutcome {
    /// Error describing an aborted run, if any.
    pub fn error(&self) -> Option<NonceQueueError> {
        match *self {
            RunOutcome::Aborted { expected, actual } => {
                Some(NonceQueueError::ResultCountMismatch { expected, actual })
            }
            _ => None,
        }
    }
}

/// Summary of a single reconciler run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Read strategy used, if a read was issued.
    pub fetch_mode: Option<FetchMode>,
    /// Entries dropped for exceeding the retention window.
    pub evicted: usize,
    /// Entries in the snapshot that were queried.
    pub queried: usize,
    /// Store entries removed on resolution (duplicates included).
    pub removed: usize,
    /// Distinct operations accepted downstream.
    pub resubmitted: usize,
    /// Distinct operations rejected downstream.
    pub rejected: usize,
    /// Entries whose read failed and stay queued.
    pub deferred: usize,
    /// Entries whose nonce is not current yet.
    pub still_pending: usize,
}

impl ReconcileReport {
    /// True if the run changed the store or called downstream.
    pub fn had_activity(&self) -> bool {
        self.evicted + self.removed > 0
    }
}

/// Point-in-time view of the queue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueStatus {
    /// Entries currently queued.
    pub queued: usize,
    /// Age of the oldest entry in milliseconds.
    pub oldest_entry_age_ms: u64,
    /// Whether the scheduled reconciler task is running.
    pub running: bool,
}
