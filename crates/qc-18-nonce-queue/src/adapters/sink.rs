//! Channel-backed downstream adapter.
//!
//! Hands released operations to the task that owns the primary pool.

use crate::domain::{Address, UserOperation};
use crate::ports::outbound::OperationSink;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

/// An operation released by the queue, addressed to its entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleasedOperation {
    /// Operation payload.
    pub operation: UserOperation,
    /// Entry point the operation targets.
    pub entry_point: Address,
}

/// `OperationSink` that forwards over a bounded mpsc channel.
#[derive(Clone, Debug)]
pub struct ChannelOperationSink {
    sender: mpsc::Sender<ReleasedOperation>,
}

impl ChannelOperationSink {
    /// Creates a sink and the receiver the pool task should drain.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ReleasedOperation>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl OperationSink for ChannelOperationSink {
    async fn accept(&self, operation: UserOperation, entry_point: Address) -> bool {
        match self.sender.try_send(ReleasedOperation {
            operation,
            entry_point,
        }) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("[qc-18] Pool channel full, operation dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("[qc-18] Pool channel closed, operation dropped");
                false
            }
        }
    }
}
