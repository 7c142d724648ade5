//! Queue store for nonce-gated operations.
//!
//! Append-only except for `remove_matching`, which swaps the whole contents
//! under a single write lock. Readers work on cloned snapshots.

use super::entities::{Hash, QueuedEntry, Timestamp};
use parking_lot::RwLock;

/// Ordered, process-local collection of queued entries.
#[derive(Debug, Default)]
pub struct QueueStore {
    entries: RwLock<Vec<QueuedEntry>>,
}

impl QueueStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    ///
    /// `enqueued_at` is raised to the last entry's timestamp if the caller's
    /// clock reading lost a race with a concurrent push, so insertion order
    /// and timestamp order always agree.
    pub fn push(&self, mut entry: QueuedEntry) {
        let mut entries = self.entries.write();
        if let Some(last) = entries.last() {
            entry.enqueued_at = entry.enqueued_at.max(last.enqueued_at);
        }
        entries.push(entry);
    }

    /// Removes every entry matching `predicate` and returns them.
    pub fn remove_matching<F>(&self, predicate: F) -> Vec<QueuedEntry>
    where
        F: FnMut(&QueuedEntry) -> bool,
    {
        let mut entries = self.entries.write();
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut *entries).into_iter().partition(predicate);
        *entries = kept;
        removed
    }

    /// Removes entries older than `retention_ms` at `now`.
    pub fn evict_expired(&self, now: Timestamp, retention_ms: u64) -> Vec<QueuedEntry> {
        self.remove_matching(|entry| entry.is_expired(now, retention_ms))
    }

    /// Immutable copy of the current contents, in insertion order.
    pub fn snapshot(&self) -> Vec<QueuedEntry> {
        self.entries.read().clone()
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// True if at least one entry carries `hash`.
    pub fn contains(&self, hash: &Hash) -> bool {
        self.entries
            .read()
            .iter()
            .any(|entry| entry.operation_hash() == hash)
    }

    /// Insertion time of the oldest entry.
    pub fn oldest_enqueued_at(&self) -> Option<Timestamp> {
        self.entries.read().first().map(QueuedEntry::enqueued_at)
    }
}
