//! # Domain Layer - Nonce Queue
//!
//! Pure logic with no I/O.
//!
//! - `entities`: `UserOperation`, `QueuedEntry`, primitive aliases
//! - `operation`: sender/nonce/hash derivation
//! - `store`: `QueueStore` with atomic predicate removal
//! - `value_objects`: read queries, outcomes, run reports

pub mod entities;
pub mod operation;
pub mod store;
pub mod value_objects;

pub use entities::*;
pub use operation::*;
pub use store::*;
pub use value_objects::*;
