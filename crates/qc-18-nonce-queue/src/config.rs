//! Configuration types for the nonce queue

use crate::error::{NonceQueueError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Runtime configuration for the nonce queue
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NonceQueueConfig {
    /// Period between reconciler runs (milliseconds)
    pub reconcile_interval_ms: u64,

    /// Maximum time an operation may stay queued (milliseconds)
    pub retention_ms: u64,

    /// Chain id mixed into operation hashes
    pub chain_id: u64,
}

impl Default for NonceQueueConfig {
    fn default() -> Self {
        Self {
            reconcile_interval_ms: crate::DEFAULT_RECONCILE_INTERVAL_MS,
            retention_ms: crate::DEFAULT_RETENTION_MS,
            chain_id: 1,
        }
    }
}

impl NonceQueueConfig {
    /// Creates a fast-ticking config for testing.
    pub fn for_testing() -> Self {
        Self {
            reconcile_interval_ms: 50,
            retention_ms: 60_000,
            ..Default::default()
        }
    }

    /// Reconcile period as a `Duration`.
    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_millis(self.reconcile_interval_ms)
    }

    /// Checks that the intervals are usable.
    pub fn validate(&self) -> Result<()> {
        if self.reconcile_interval_ms == 0 {
            return Err(NonceQueueError::InvalidConfig(
                "reconcile_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.retention_ms == 0 {
            return Err(NonceQueueError::InvalidConfig(
                "retention_ms must be greater than zero".to_string(),
            ));
        }
        if self.retention_ms < self.reconcile_interval_ms {
            return Err(NonceQueueError::InvalidConfig(format!(
                "retention_ms ({}) shorter than reconcile_interval_ms ({})",
                self.retention_ms, self.reconcile_interval_ms
            )));
        }
        Ok(())
    }
}
