//! Keccak-256 helpers used for identifier derivation

use sha3::{Digest, Keccak256};

/// Keccak-256 of a single buffer
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Keccak-256 over the concatenation of several buffers
pub fn keccak256_multi(data: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for d in data {
        hasher.update(d);
    }
    hasher.finalize().into()
}
