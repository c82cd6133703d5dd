//! # Ledger Configuration & Constants
//!
//! Every fixed value the ledger depends on lives here. The block
//! constructor and the chain validator both read these, so a recomputed
//! digest always matches the one produced at construction time.
//!
//! Changing any of the genesis or timestamp constants after a ledger has
//! been written makes that ledger's genesis block unreproducible. Existing
//! files still load and validate (validation never recomputes genesis), but
//! freshly created ledgers will no longer match old ones byte for byte.

/// Version of this crate, reported by front ends.
pub const LEDGER_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// Genesis Block
// ---------------------------------------------------------------------------

/// Payload carried by the genesis block. Genesis holds no certificate, so
/// search skips it regardless of this value.
pub const GENESIS_DATA: &str = "Genesis Block";

/// Sentinel stored as the genesis block's `previous_hash`.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Index of the genesis block.
pub const GENESIS_INDEX: u64 = 0;

// ---------------------------------------------------------------------------
// Block Fields
// ---------------------------------------------------------------------------

/// `strftime` pattern for block timestamps (local time, second precision).
///
/// Timestamps are informational. They feed the digest but are never
/// compared for ordering.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Name of the digest function used for block hashes and fingerprints.
pub const HASH_FUNCTION: &str = "SHA-256";

/// Length of a hex-encoded digest, in characters.
pub const HASH_HEX_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Ledger file used when the caller does not name one.
pub const DEFAULT_LEDGER_FILE: &str = "blockchain_data.json";

/// Extension given to the sibling file a save is staged in before it is
/// renamed over the ledger.
pub const TEMP_FILE_EXTENSION: &str = "tmp";

/// Indentation of the persisted JSON array. Four spaces keeps files
/// diff-compatible with ledgers written by earlier deployments.
pub const JSON_INDENT: &[u8] = b"    ";

// ---------------------------------------------------------------------------
// Certificates
// ---------------------------------------------------------------------------

/// Value an extraction pipeline records for a field it could not read.
pub const FIELD_NOT_FOUND: &str = "Not Found";

/// Separator placed between canonical certificate fields before hashing.
pub const FINGERPRINT_FIELD_SEPARATOR: &str = "|";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_sentinel_is_not_a_digest() {
        // A real digest can never collide with the sentinel.
        assert_ne!(GENESIS_PREVIOUS_HASH.len(), HASH_HEX_LENGTH);
    }

    #[test]
    fn timestamp_format_renders() {
        let rendered = chrono::NaiveDate::from_ymd_opt(2025, 5, 13)
            .and_then(|d| d.and_hms_opt(9, 4, 5))
            .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string());
        assert_eq!(rendered.as_deref(), Some("13/05/2025 09:04:05"));
    }
}
