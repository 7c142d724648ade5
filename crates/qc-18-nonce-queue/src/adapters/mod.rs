//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the outbound ports.

mod clock;
mod ledger;
mod sink;

pub use clock::ManualTimeSource;
pub use ledger::InMemoryLedger;
pub use sink::{ChannelOperationSink, ReleasedOperation};
