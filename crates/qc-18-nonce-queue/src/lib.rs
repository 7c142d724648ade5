//! # Nonce Queue Subsystem
//!
//! **Subsystem ID:** 18
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Holds user operations the mempool cannot admit yet because their nonce is
//! ahead of the chain. A periodic reconciler re-reads on-chain nonces and
//! releases operations to the mempool as soon as their nonce becomes current.
//! Operations that wait longer than the retention window are dropped.
//!
//! ## Reconciler Pass
//!
//! | Step | Effect |
//! |------|--------|
//! | Evict | Drop entries older than `retention_ms`; stop if nothing is left |
//! | Snapshot | Freeze the entries this pass decides on |
//! | Fetch | One batched nonce read, per-entry reads if the batch fails |
//! | Guard | Abort without mutation if result count ≠ query count |
//! | Decide | Sequence equal to on-chain ⇒ eligible; read failure ⇒ deferred |
//! | Resolve | Remove every entry with an eligible hash, resubmit once per hash |
//!
//! Passes never overlap. Enqueues during a pass are seen by the next one.
//!
//! ## Module Structure
//!
//! ```text
//! qc-18-nonce-queue/
//! ├── domain/      # UserOperation, QueuedEntry, QueueStore, derivations
//! ├── ports/       # NonceQueueApi, NonceReader, OperationSink, TimeSource
//! ├── adapters/    # InMemoryLedger, ChannelOperationSink, ManualTimeSource
//! ├── fetch.rs     # batched read with per-entry fallback
//! └── service.rs   # NonceQueueService + scheduled reconciler
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{ChannelOperationSink, InMemoryLedger, ManualTimeSource, ReleasedOperation};
pub use config::NonceQueueConfig;
pub use domain::{
    compose_nonce, compute_operation_hash, decompose_nonce, derive_sender, Address, FetchMode,
    Hash, NonceQuery, NonceReadOutcome, QueueStatus, QueueStore, QueuedEntry, ReconcileReport,
    RunOutcome, Timestamp, UserOperation, U256,
};
pub use error::{NonceQueueError, Result};
pub use metrics::ReconcileStats;
pub use ports::{NonceQueueApi, NonceReader, OperationSink, SystemTimeSource, TimeSource};
pub use service::NonceQueueService;

/// Default period between reconciler passes (2 seconds)
pub const DEFAULT_RECONCILE_INTERVAL_MS: u64 = 2_000;

/// Default retention window (15 minutes)
pub const DEFAULT_RETENTION_MS: u64 = 15 * 60 * 1_000;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
