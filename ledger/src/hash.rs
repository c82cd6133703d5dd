//! # Hashing Utilities
//!
//! SHA-256, hex-encoded in lower case, is the only digest the ledger uses.
//! Block hashes and certificate fingerprints both come through here.
//!
//! ## Block digest layout
//!
//! ```text
//! SHA-256( decimal(index) || timestamp || data || previous_hash )
//! ```
//!
//! The fields are concatenated as UTF-8 with no separator. That layout is
//! what existing ledger files were written with, so it is frozen: a
//! different layout would make every stored hash fail recomputation.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute SHA-256 and return it as lower-case hex.
///
/// ```
/// use certchain_ledger::hash::sha256_hex;
///
/// assert_eq!(
///     sha256_hex(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// ```
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Hash several byte slices as if they were concatenated.
pub fn sha256_hex_multi(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// The block digest. Shared by [`Block::new`](crate::storage::Block::new)
/// and [`Block::compute_hash`](crate::storage::Block::compute_hash).
pub fn block_digest(index: u64, timestamp: &str, data: &str, previous_hash: &str) -> String {
    let index = index.to_string();
    sha256_hex_multi(&[
        index.as_bytes(),
        timestamp.as_bytes(),
        data.as_bytes(),
        previous_hash.as_bytes(),
    ])
}

/// True if `s` has the shape of a digest produced by this module.
pub fn is_hex_digest(s: &str) -> bool {
    s.len() == crate::config::HASH_HEX_LENGTH
        && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
