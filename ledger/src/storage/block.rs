//! # Block Structure
//!
//! A block is one ledger entry: a certificate fingerprint pinned to a
//! position in the chain and linked to the block before it.
//!
//! ## Block Layout
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  Block                                        │
//! │  ├── index: u64                               │
//! │  ├── timestamp: String   (%d/%m/%Y %H:%M:%S)  │
//! │  ├── data: String        (fingerprint)        │
//! │  ├── previous_hash: String                    │
//! │  └── hash: String        (SHA-256, hex)       │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Claimed vs. actual hash
//!
//! [`Block::hash`] is the digest the block *claims*. For a block built with
//! [`Block::new`] it is also the digest it *matches*. A block rebuilt from a
//! [`BlockRecord`] keeps the stored digest verbatim, so the two can differ,
//! and [`Block::compute_hash`] is how validation tells them apart.

use serde::{Deserialize, Serialize};

use crate::config::{GENESIS_DATA, GENESIS_INDEX, GENESIS_PREVIOUS_HASH, TIMESTAMP_FORMAT};
use crate::hash::block_digest;

// ---------------------------------------------------------------------------
// BlockRecord
// ---------------------------------------------------------------------------

/// On-disk form of a block: one element of the ledger file's JSON array.
///
/// Every field is required. A record missing any of them fails to
/// deserialize, which the file store reports as a corrupt ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub index: u64,
    pub timestamp: String,
    pub data: String,
    pub previous_hash: String,
    pub hash: String,
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// An immutable, hash-linked ledger entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    index: u64,
    timestamp: String,
    data: String,
    previous_hash: String,
    hash: String,
}

impl Block {
    /// Build a block and compute its digest from the four content fields.
    pub fn new(
        index: u64,
        timestamp: impl Into<String>,
        data: impl Into<String>,
        previous_hash: impl Into<String>,
    ) -> Self {
        let timestamp = timestamp.into();
        let data = data.into();
        let previous_hash = previous_hash.into();
        let hash = block_digest(index, &timestamp, &data, &previous_hash);

        Block {
            index,
            timestamp,
            data,
            previous_hash,
            hash,
        }
    }

    /// Construct the genesis block.
    ///
    /// Index 0, the fixed genesis payload, and the `"0"` sentinel as its
    /// predecessor link. Only the timestamp varies between ledgers.
    pub fn genesis(timestamp: impl Into<String>) -> Self {
        Block::new(GENESIS_INDEX, timestamp, GENESIS_DATA, GENESIS_PREVIOUS_HASH)
    }

    /// Rebuild a block from its stored record.
    ///
    /// The stored `hash` is taken as-is and never recomputed here.
    pub fn from_record(record: BlockRecord) -> Self {
        Block {
            index: record.index,
            timestamp: record.timestamp,
            data: record.data,
            previous_hash: record.previous_hash,
            hash: record.hash,
        }
    }

    /// Produce the on-disk record for this block.
    pub fn to_record(&self) -> BlockRecord {
        BlockRecord {
            index: self.index,
            timestamp: self.timestamp.clone(),
            data: self.data.clone(),
            previous_hash: self.previous_hash.clone(),
            hash: self.hash.clone(),
        }
    }

    /// Recompute the digest from the stored content fields.
    ///
    /// Use this to check that [`hash`](Self::hash) matches the actual content.
    pub fn compute_hash(&self) -> String {
        block_digest(self.index, &self.timestamp, &self.data, &self.previous_hash)
    }

    /// True if the stored hash matches the recomputed one.
    pub fn is_intact(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// True for the block at index 0.
    pub fn is_genesis(&self) -> bool {
        self.index == GENESIS_INDEX
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The payload: a certificate fingerprint, or the genesis marker.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    /// The digest this block claims for itself.
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl From<BlockRecord> for Block {
    fn from(record: BlockRecord) -> Self {
        Block::from_record(record)
    }
}

impl From<&Block> for BlockRecord {
    fn from(block: &Block) -> Self {
        block.to_record()
    }
}

/// Current local time rendered in the block timestamp format.
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
