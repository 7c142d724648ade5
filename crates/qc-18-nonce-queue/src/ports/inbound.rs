//! # Inbound Port - NonceQueueApi
//!
//! API offered to the RPC layer and to the owning node.

use crate::domain::{Address, Hash, QueueStatus, ReconcileReport, UserOperation};
use crate::error::Result;
use async_trait::async_trait;

/// Primary API of the nonce queue.
///
/// # Example
///
/// ```rust,ignore
/// let queue = Arc::new(NonceQueueService::new(config, reader, sink)?);
///
/// // RPC handler: mempool rejected the op because its nonce is ahead
/// let hash = queue.enqueue(op, entry_point)?;
///
/// // Manual pass, e.g. after a new block
/// let report = queue.reconcile_once().await;
/// ```
///
/// The periodic task is owned by the service itself
/// (`NonceQueueService::start` / `NonceQueueService::stop`).
#[async_trait]
pub trait NonceQueueApi: Send + Sync {
    /// Queues an operation until its nonce becomes current.
    ///
    /// # Errors
    /// - `InvalidOperation`: sender/nonce/hash could not be derived
    fn enqueue(&self, operation: UserOperation, entry_point: Address) -> Result<Hash>;

    /// Runs one reconciliation pass. Never overlaps another pass.
    async fn reconcile_once(&self) -> ReconcileReport;

    /// Checks if an operation hash is queued.
    fn contains(&self, hash: &Hash) -> bool;

    /// Current queue status.
    fn status(&self) -> QueueStatus;

    /// Number of queued entries.
    fn len(&self) -> usize;

    /// Returns true if nothing is queued.
    fn is_empty(&self) -> bool;
}
