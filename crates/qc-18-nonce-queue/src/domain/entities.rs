//! Core domain entities for the nonce queue.
//!
//! A `UserOperation` is the account-abstraction payload submitted through an
//! entry point contract. A `QueuedEntry` wraps one operation together with
//! the values derived from it at enqueue time.

use super::operation::{compute_operation_hash, decompose_nonce, derive_sender};
use crate::error::Result;

pub use primitive_types::U256;

/// A 20-byte account or contract address.
pub type Address = [u8; 20];

/// A 32-byte Keccak-256 hash.
pub type Hash = [u8; 32];

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

/// Account-abstraction operation as submitted to an entry point.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct UserOperation {
    /// Smart account sending the operation.
    pub sender: Address,
    /// Full 256-bit nonce: `key << 64 | sequence`.
    pub nonce: U256,
    /// Account factory call data (empty for deployed accounts).
    pub init_code: Vec<u8>,
    /// Call executed by the account.
    pub call_data: Vec<u8>,
    /// Gas for the main execution call.
    pub call_gas_limit: U256,
    /// Gas for the verification step.
    pub verification_gas_limit: U256,
    /// Gas paid to the bundler for calldata and overhead.
    pub pre_verification_gas: U256,
    /// EIP-1559 max fee per gas.
    pub max_fee_per_gas: U256,
    /// EIP-1559 max priority fee per gas.
    pub max_priority_fee_per_gas: U256,
    /// Paymaster address followed by paymaster-specific data.
    pub paymaster_and_data: Vec<u8>,
    /// Account signature over the operation hash.
    pub signature: Vec<u8>,
}

/// One operation waiting for its nonce to become current on-chain.
///
/// Nonce parts and hash are derived once at construction and never change.
/// Duplicate hashes across entries are allowed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueuedEntry {
    entry_point: Address,
    operation_hash: Hash,
    operation: UserOperation,
    nonce_key: U256,
    nonce_value: u64,
    pub(crate) enqueued_at: Timestamp,
}

impl QueuedEntry {
    /// Builds an entry, deriving hash and nonce parts from the operation.
    ///
    /// # Errors
    /// Returns `InvalidOperation` if the operation has no usable sender.
    pub fn new(
        operation: UserOperation,
        entry_point: Address,
        chain_id: u64,
        enqueued_at: Timestamp,
    ) -> Result<Self> {
        derive_sender(&operation)?;
        let operation_hash = compute_operation_hash(&operation, &entry_point, chain_id);
        let (nonce_key, nonce_value) = decompose_nonce(operation.nonce);

        Ok(Self {
            entry_point,
            operation_hash,
            operation,
            nonce_key,
            nonce_value,
            enqueued_at,
        })
    }

    /// Entry point contract owning the nonce namespace.
    pub fn entry_point(&self) -> &Address {
        &self.entry_point
    }

    /// Content hash of operation, entry point and chain id.
    pub fn operation_hash(&self) -> &Hash {
        &self.operation_hash
    }

    /// Account whose nonce gates this entry, re-derived from the payload.
    pub fn sender(&self) -> Address {
        self.operation.sender
    }

    /// The queued payload.
    pub fn operation(&self) -> &UserOperation {
        &self.operation
    }

    /// Non-sequential nonce namespace (upper 192 bits).
    pub fn nonce_key(&self) -> U256 {
        self.nonce_key
    }

    /// Sequence number that must match on-chain (lower 64 bits).
    pub fn nonce_value(&self) -> u64 {
        self.nonce_value
    }

    /// Insertion time (ms).
    pub fn enqueued_at(&self) -> Timestamp {
        self.enqueued_at
    }

    /// True once the entry has outlived `retention_ms` at `now`.
    pub fn is_expired(&self, now: Timestamp, retention_ms: u64) -> bool {
        now.saturating_sub(self.enqueued_at) > retention_ms
    }

    /// Short hex form of the hash for logs.
    pub fn short_hash(&self) -> String {
        hex::encode(&self.operation_hash[..4])
    }
}
