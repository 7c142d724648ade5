//! Nonce Queue Service
//!
//! Owns the queue store, the outbound ports and the scheduled reconciler
//! task. One reconciler pass:
//!
//! ```text
//! evict expired ──→ snapshot ──→ fetch nonces ──→ count guard ──→ decide ──→ remove ──→ resubmit
//!       │                          (batch, then                    │
//!       └── store empty: stop       per-entry)                     └── mismatch: abort, no mutation
//! ```

use crate::{
    config::NonceQueueConfig,
    domain::{
        decompose_nonce, Address, Hash, NonceQuery, QueueStatus, QueueStore, QueuedEntry,
        ReconcileReport, RunOutcome, UserOperation,
    },
    error::{NonceQueueError, Result},
    fetch::fetch_nonces,
    metrics::ReconcileStats,
    ports::{NonceQueueApi, NonceReader, OperationSink, SystemTimeSource, TimeSource},
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Handle to the scheduled reconciler task.
struct ReconcilerTask {
    handle: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

/// Holding queue for operations whose nonce is ahead of the chain.
pub struct NonceQueueService {
    config: NonceQueueConfig,
    store: QueueStore,
    reader: Arc<dyn NonceReader>,
    sink: Arc<dyn OperationSink>,
    clock: Arc<dyn TimeSource>,
    stats: Arc<ReconcileStats>,
    /// Serializes reconciler passes.
    run_lock: tokio::sync::Mutex<()>,
    task: parking_lot::Mutex<Option<ReconcilerTask>>,
}

impl NonceQueueService {
    /// Create a new nonce queue service
    pub fn new(
        config: NonceQueueConfig,
        reader: Arc<dyn NonceReader>,
        sink: Arc<dyn OperationSink>,
    ) -> Result<Self> {
        config.validate()?;

        info!("[qc-18] Initializing Nonce Queue Service");
        info!("  Reconcile Interval: {}ms", config.reconcile_interval_ms);
        info!("  Retention: {}ms", config.retention_ms);
        info!("  Chain ID: {}", config.chain_id);

        Ok(Self {
            config,
            store: QueueStore::new(),
            reader,
            sink,
            clock: Arc::new(SystemTimeSource),
            stats: Arc::new(ReconcileStats::default()),
            run_lock: tokio::sync::Mutex::new(()),
            task: parking_lot::Mutex::new(None),
        })
    }

    /// Replace the wall clock (retention is measured against it)
    pub fn with_time_source(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &NonceQueueConfig {
        &self.config
    }

    /// Get statistics
    pub fn stats(&self) -> Arc<ReconcileStats> {
        Arc::clone(&self.stats)
    }

    /// Copy of the queued entries in insertion order
    pub fn snapshot(&self) -> Vec<QueuedEntry> {
        self.store.snapshot()
    }

    /// Whether the scheduled task is running
    pub fn is_running(&self) -> bool {
        self.task.lock().is_some()
    }

    /// Spawn the periodic reconciler.
    ///
    /// The task holds only a weak reference, so it ends when the service is
    /// dropped. Ticks missed while a pass is in flight are skipped.
    pub fn start(self: &Arc<Self>) -> Result<()> {
        let mut task = self.task.lock();
        if task.is_some() {
            return Err(NonceQueueError::AlreadyRunning);
        }

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let service: Weak<Self> = Arc::downgrade(self);
        let period = self.config.reconcile_interval();

        let handle = tokio::spawn(async move {
            debug!("[qc-18] Reconciler task started");
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let Some(service) = service.upgrade() else { break };
                        service.reconcile_once().await;
                    }
                }
            }
            debug!("[qc-18] Reconciler task exited");
        });

        *task = Some(ReconcilerTask {
            handle,
            shutdown_tx,
        });
        info!(
            "[qc-18] Reconciler started (every {}ms)",
            self.config.reconcile_interval_ms
        );
        Ok(())
    }

    /// Stop the periodic reconciler, letting an in-flight pass finish.
    pub async fn stop(&self) -> Result<()> {
        let task = self.task.lock().take().ok_or(NonceQueueError::NotRunning)?;

        let _ = task.shutdown_tx.send(());
        if let Err(e) = task.handle.await {
            error!("[qc-18] Reconciler task ended abnormally: {}", e);
        }

        info!("[qc-18] Reconciler stopped ({} entries queued)", self.store.len());
        Ok(())
    }

    async fn run(&self) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let now = self.clock.now();
        let evicted = self.store.evict_expired(now, self.config.retention_ms);
        report.evicted = evicted.len();
        for entry in &evicted {
            debug!(
                "[qc-18] Evicted op {} (queued {}ms ago)",
                entry.short_hash(),
                now.saturating_sub(entry.enqueued_at())
            );
        }
        if !evicted.is_empty() {
            info!("[qc-18] Evicted {} expired operations", evicted.len());
        }

        if self.store.is_empty() {
            return report;
        }

        let snapshot = self.store.snapshot();
        let queries: Vec<NonceQuery> = snapshot
            .iter()
            .map(|entry| NonceQuery {
                entry_point: *entry.entry_point(),
                sender: entry.sender(),
                key: entry.nonce_key(),
            })
            .collect();
        report.queried = queries.len();

        let fetch = fetch_nonces(self.reader.as_ref(), &queries).await;
        report.fetch_mode = Some(fetch.mode);

        if fetch.outcomes.len() != queries.len() {
            report.outcome = RunOutcome::Aborted {
                expected: queries.len(),
                actual: fetch.outcomes.len(),
            };
            if let Some(err) = report.outcome.error() {
                error!("[qc-18] {}, skipping run", err);
            }
            return report;
        }

        let mut eligible: Vec<QueuedEntry> = Vec::new();
        let mut eligible_hashes: HashSet<Hash> = HashSet::new();

        for (entry, outcome) in snapshot.into_iter().zip(fetch.outcomes) {
            match outcome {
                Err(e) => {
                    warn!(
                        "[qc-18] Nonce read failed for op {}: {}",
                        entry.short_hash(),
                        e
                    );
                    report.deferred += 1;
                }
                Ok(onchain) => {
                    let (_, current) = decompose_nonce(onchain);
                    if current == entry.nonce_value() {
                        if eligible_hashes.insert(*entry.operation_hash()) {
                            eligible.push(entry);
                        }
                    } else {
                        debug!(
                            "[qc-18] Op {} waiting: nonce {} vs on-chain {}",
                            entry.short_hash(),
                            entry.nonce_value(),
                            current
                        );
                        report.still_pending += 1;
                    }
                }
            }
        }

        if !eligible_hashes.is_empty() {
            let removed = self
                .store
                .remove_matching(|entry| eligible_hashes.contains(entry.operation_hash()));
            report.removed = removed.len();
        }

        for entry in eligible {
            let hash = entry.short_hash();
            if self
                .sink
                .accept(entry.operation().clone(), *entry.entry_point())
                .await
            {
                debug!("[qc-18] Op {} resubmitted to mempool", hash);
                report.resubmitted += 1;
            } else {
                warn!("[qc-18] Mempool rejected resubmitted op {}", hash);
                report.rejected += 1;
            }
        }

        report.outcome = RunOutcome::Completed;
        report
    }
}

#[async_trait]
impl NonceQueueApi for NonceQueueService {
    fn enqueue(&self, operation: UserOperation, entry_point: Address) -> Result<Hash> {
        let entry = QueuedEntry::new(
            operation,
            entry_point,
            self.config.chain_id,
            self.clock.now(),
        )?;
        let hash = *entry.operation_hash();

        debug!(
            "[qc-18] Queued op {} (nonce {}), queue size {}",
            entry.short_hash(),
            entry.nonce_value(),
            self.store.len() + 1
        );
        self.store.push(entry);
        self.stats
            .enqueued
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Ok(hash)
    }

    async fn reconcile_once(&self) -> ReconcileReport {
        let _guard = self.run_lock.lock().await;

        let report = self.run().await;
        self.stats.record(&report);

        if report.had_activity() || report.rejected > 0 {
            info!(
                "[qc-18] Reconcile: {} resubmitted, {} rejected, {} evicted, {} pending, {} deferred",
                report.resubmitted,
                report.rejected,
                report.evicted,
                report.still_pending,
                report.deferred
            );
        }
        report
    }

    fn contains(&self, hash: &Hash) -> bool {
        self.store.contains(hash)
    }

    fn status(&self) -> QueueStatus {
        let now = self.clock.now();
        QueueStatus {
            queued: self.store.len(),
            oldest_entry_age_ms: self
                .store
                .oldest_enqueued_at()
                .map(|at| now.saturating_sub(at))
                .unwrap_or(0),
            running: self.is_running(),
        }
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
