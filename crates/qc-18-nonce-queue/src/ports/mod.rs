//! Ports layer for the nonce queue.
//!
//! - Inbound (Driving) ports: API exposed to the node and RPC layer
//! - Outbound (Driven) ports: ledger, downstream pool, clock

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
