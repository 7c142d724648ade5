//! In-memory ledger adapter.
//!
//! Implements `NonceReader` over a local map of nonce sequences. Failure
//! switches let callers reproduce an unreachable aggregator, a failing
//! account and a truncated batch response.

use crate::domain::{compose_nonce, Address, NonceQuery, NonceReadOutcome, U256};
use crate::error::{NonceQueueError, Result};
use crate::ports::outbound::NonceReader;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use tracing::debug;

type NonceSlot = (Address, Address, U256);

/// Nonce reader backed by a local map.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    sequences: RwLock<HashMap<NonceSlot, u64>>,
    failing_senders: RwLock<HashSet<Address>>,
    batch_unavailable: AtomicBool,
    truncate_batch_by: AtomicUsize,
    batch_calls: AtomicU64,
    single_calls: AtomicU64,
}

impl InMemoryLedger {
    /// Create an empty ledger; unknown slots read as sequence 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current sequence for `(entry_point, sender, key)`.
    pub fn set_sequence(&self, entry_point: Address, sender: Address, key: U256, sequence: u64) {
        self.sequences
            .write()
            .insert((entry_point, sender, key), sequence);
    }

    /// Makes the aggregated call fail as a whole.
    pub fn set_batch_unavailable(&self, unavailable: bool) {
        self.batch_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes every read for `sender` fail.
    pub fn fail_sender(&self, sender: Address) {
        self.failing_senders.write().insert(sender);
    }

    /// Clears a failure set by [`fail_sender`](Self::fail_sender).
    pub fn recover_sender(&self, sender: &Address) {
        self.failing_senders.write().remove(sender);
    }

    /// Drops the last `count` outcomes from every batched response.
    pub fn truncate_batch_by(&self, count: usize) {
        self.truncate_batch_by.store(count, Ordering::SeqCst);
    }

    /// Number of aggregated calls served.
    pub fn batch_calls(&self) -> u64 {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// Number of single calls served.
    pub fn single_calls(&self) -> u64 {
        self.single_calls.load(Ordering::SeqCst)
    }

    fn read(&self, query: &NonceQuery) -> NonceReadOutcome {
        if self.failing_senders.read().contains(&query.sender) {
            return Err(NonceQueueError::NonceReadFailed {
                sender: hex::encode(query.sender),
                reason: "account read reverted".to_string(),
            });
        }
        let sequence = self
            .sequences
            .read()
            .get(&(query.entry_point, query.sender, query.key))
            .copied()
            .unwrap_or(0);
        Ok(compose_nonce(query.key, sequence))
    }
}

#[async_trait]
impl NonceReader for InMemoryLedger {
    async fn get_nonces(&self, queries: &[NonceQuery]) -> Result<Vec<NonceReadOutcome>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);

        if self.batch_unavailable.load(Ordering::SeqCst) {
            return Err(NonceQueueError::LedgerUnavailable(
                "aggregate call failed".to_string(),
            ));
        }

        let mut outcomes: Vec<_> = queries.iter().map(|q| self.read(q)).collect();
        let truncate = self.truncate_batch_by.load(Ordering::SeqCst);
        outcomes.truncate(outcomes.len().saturating_sub(truncate));

        debug!("[qc-18] Ledger served batch of {} nonces", outcomes.len());
        Ok(outcomes)
    }

    async fn get_nonce(&self, query: &NonceQuery) -> Result<U256> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.read(query)
    }
}
