//! Error types for the nonce queue subsystem

use thiserror::Error;

/// Result type alias for nonce queue operations
pub type Result<T> = std::result::Result<T, NonceQueueError>;

/// Errors that can occur while queueing or reconciling operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NonceQueueError {
    /// Operation payload could not be decoded into sender/nonce/hash
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The batched ledger call failed as a whole (transport/protocol)
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// A single nonce lookup failed
    #[error("Nonce read failed for sender 0x{sender}: {reason}")]
    NonceReadFailed {
        /// Hex-encoded sender address
        sender: String,
        /// Reader-provided failure reason
        reason: String,
    },

    /// Ledger returned a different number of results than queries issued
    #[error("Result count mismatch: expected {expected}, got {actual}")]
    ResultCountMismatch {
        /// Number of queries issued
        expected: usize,
        /// Number of results returned
        actual: usize,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reconciler task already started
    #[error("Reconciler already running")]
    AlreadyRunning,

    /// Reconciler task not started
    #[error("Reconciler not running")]
    NotRunning,
}
