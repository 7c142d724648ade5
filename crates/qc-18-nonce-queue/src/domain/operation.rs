//! Pure derivations over a `UserOperation`: sender, nonce parts and hash.
//!
//! The hash follows the entry point packing: every field is a 32-byte word,
//! dynamic byte fields are replaced by their Keccak-256 digest, and the
//! result is hashed again together with the entry point and chain id.

use super::entities::{Address, Hash, UserOperation, U256};
use crate::error::{NonceQueueError, Result};
use sha3::{Digest, Keccak256};

/// Width of the sequential part of a nonce, in bits.
pub const NONCE_SEQUENCE_BITS: usize = 64;

/// Returns the account whose nonce gates the operation.
///
/// # Errors
/// Returns `InvalidOperation` for the zero address.
pub fn derive_sender(operation: &UserOperation) -> Result<Address> {
    if operation.sender == [0u8; 20] {
        return Err(NonceQueueError::InvalidOperation(
            "sender is the zero address".to_string(),
        ));
    }
    Ok(operation.sender)
}

/// Splits a 256-bit nonce into `(key, sequence)`.
pub fn decompose_nonce(nonce: U256) -> (U256, u64) {
    (nonce >> NONCE_SEQUENCE_BITS, nonce.low_u64())
}

/// Inverse of [`decompose_nonce`].
pub fn compose_nonce(key: U256, sequence: u64) -> U256 {
    (key << NONCE_SEQUENCE_BITS) | U256::from(sequence)
}

/// Computes the operation hash bound to an entry point and chain.
pub fn compute_operation_hash(
    operation: &UserOperation,
    entry_point: &Address,
    chain_id: u64,
) -> Hash {
    let mut packed = Vec::with_capacity(32 * 10);
    packed.extend_from_slice(&address_word(&operation.sender));
    packed.extend_from_slice(&u256_word(operation.nonce));
    packed.extend_from_slice(&keccak256(&operation.init_code));
    packed.extend_from_slice(&keccak256(&operation.call_data));
    packed.extend_from_slice(&u256_word(operation.call_gas_limit));
    packed.extend_from_slice(&u256_word(operation.verification_gas_limit));
    packed.extend_from_slice(&u256_word(operation.pre_verification_gas));
    packed.extend_from_slice(&u256_word(operation.max_fee_per_gas));
    packed.extend_from_slice(&u256_word(operation.max_priority_fee_per_gas));
    packed.extend_from_slice(&keccak256(&operation.paymaster_and_data));

    let mut outer = Vec::with_capacity(32 * 3);
    outer.extend_from_slice(&keccak256(&packed));
    outer.extend_from_slice(&address_word(entry_point));
    outer.extend_from_slice(&u256_word(U256::from(chain_id)));

    keccak256(&outer)
}

fn keccak256(data: &[u8]) -> Hash {
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&Keccak256::digest(data));
    hash
}

fn address_word(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address);
    word
}

fn u256_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}
