//! Outbound (Driven) ports for the nonce queue.
//!
//! The queue depends on a ledger to read nonces, on the primary pool to
//! accept released operations, and on a clock.

use crate::domain::{Address, NonceQuery, NonceReadOutcome, Timestamp, UserOperation, U256};
use crate::error::Result;
use async_trait::async_trait;

/// Reads on-chain nonces from entry point contracts.
///
/// Implementations are expected to bound every call with their own timeout
/// and fail rather than hang.
#[async_trait]
pub trait NonceReader: Send + Sync {
    /// Reads all queries in one aggregated call.
    ///
    /// # Returns
    /// - `Ok(outcomes)`: one outcome per query, in query order
    /// - `Err`: the aggregated call failed as a whole
    async fn get_nonces(&self, queries: &[NonceQuery]) -> Result<Vec<NonceReadOutcome>>;

    /// Reads a single nonce.
    async fn get_nonce(&self, query: &NonceQuery) -> Result<U256>;
}

/// Primary operation pool that receives released operations.
#[async_trait]
pub trait OperationSink: Send + Sync {
    /// Offers an operation for admission. Returns true if accepted.
    async fn accept(&self, operation: UserOperation, entry_point: Address) -> bool;
}

/// Time source for consistent timestamp handling.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}
