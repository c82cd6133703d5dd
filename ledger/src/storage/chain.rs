//! # Chain
//!
//! The ordered, append-only sequence of blocks, bound to the ledger file it
//! is persisted in.
//!
//! ## Lifecycle
//!
//! [`Chain::open`] either loads an existing ledger file or, when there is
//! none, creates a genesis-only chain and writes it out straight away. A
//! loaded chain is trusted as recorded; [`Chain::validate`] is the separate,
//! on-demand check that every stored hash still holds.
//!
//! ## Validation
//!
//! For every block after genesis:
//!
//! ```text
//! block.index         == position
//! block.hash          == digest(index, timestamp, data, previous_hash)
//! block.previous_hash == chain[position - 1].hash
//! ```
//!
//! Editing any content field of a block breaks the second check for that
//! block. Re-hashing the edited block to hide that breaks the third check
//! for its successor.

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use super::block::{now_timestamp, Block, BlockRecord};
use super::file::LedgerFile;
use crate::error::LedgerResult;

// ---------------------------------------------------------------------------
// Validation results
// ---------------------------------------------------------------------------

/// Why a block failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The block's stored index does not match its position in the chain.
    IndexMismatch { expected: u64, found: u64 },
    /// The stored hash does not match the digest of the block's content.
    HashMismatch { stored: String, computed: String },
    /// The stored `previous_hash` does not match the predecessor's hash.
    BrokenLink { expected: String, found: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::IndexMismatch { expected, found } => {
                write!(f, "index mismatch: expected {expected}, found {found}")
            }
            Violation::HashMismatch { stored, computed } => {
                write!(f, "hash mismatch: stored={stored}, computed={computed}")
            }
            Violation::BrokenLink { expected, found } => {
                write!(f, "broken link: expected previous_hash={expected}, found {found}")
            }
        }
    }
}

/// Outcome of [`Chain::validate`].
///
/// A broken chain is an observable state, not an error: callers get this
/// value back and decide what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of blocks examined, genesis included.
    pub blocks_checked: usize,
    /// First violation found, with the position of the offending block.
    pub failure: Option<(usize, Violation)>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => write!(f, "chain intact ({} blocks)", self.blocks_checked),
            Some((position, violation)) => write!(f, "block {position}: {violation}"),
        }
    }
}

/// Outcome of [`Chain::verify`]: the three answers a verification flow has
/// to keep apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The chain is intact and holds the fingerprint in this block.
    Verified(Block),
    /// The chain is intact and does not hold the fingerprint.
    NotFound,
    /// The chain failed validation, so no answer can be trusted.
    ChainBroken(ValidationReport),
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Append-only chain of blocks, persisted after every change.
///
/// Never empty: position 0 always holds the genesis block.
#[derive(Debug)]
pub struct Chain {
    blocks: Vec<Block>,
    store: LedgerFile,
}

impl Chain {
    /// Load the ledger at `path`, or create and persist a fresh one.
    ///
    /// # Errors
    ///
    /// - `StorageCorrupt` if the file exists but is not a block sequence.
    /// - `StorageUnavailable` if the file exists but cannot be read.
    /// - `Persistence` if a fresh ledger cannot be written.
    pub fn open<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let store = LedgerFile::new(path);

        if store.exists()? {
            return Self::from_store(store);
        }

        let chain = Chain {
            blocks: vec![Block::genesis(now_timestamp())],
            store,
        };
        chain.persist()?;
        info!(
            path = %chain.store.path().display(),
            genesis = %chain.latest().hash(),
            "created new ledger"
        );
        Ok(chain)
    }

    /// Load the ledger at `path`, which must already exist. A missing file
    /// is `StorageUnavailable` and nothing is written.
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        Self::from_store(LedgerFile::new(path))
    }

    fn from_store(store: LedgerFile) -> LedgerResult<Self> {
        let blocks = store
            .load()?
            .into_iter()
            .map(Block::from_record)
            .collect::<Vec<_>>();
        debug!(path = %store.path().display(), blocks = blocks.len(), "loaded ledger");
        Ok(Chain { blocks, store })
    }

    /// The tail block. Never fails: the chain always holds genesis.
    pub fn latest(&self) -> &Block {
        // `blocks` is non-empty by construction: `open` seeds genesis or
        // rejects an empty file, and nothing ever removes a block.
        &self.blocks[self.blocks.len() - 1]
    }

    /// The genesis block.
    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// Append a block carrying `data` and persist the chain.
    ///
    /// If the write fails, the new block is dropped again before the error
    /// is returned, so the in-memory chain never runs ahead of the file.
    pub fn append(&mut self, data: impl Into<String>) -> LedgerResult<Block> {
        let block = Block::new(
            self.blocks.len() as u64,
            now_timestamp(),
            data,
            self.latest().hash(),
        );
        self.blocks.push(block.clone());

        if let Err(e) = self.persist() {
            self.blocks.pop();
            warn!(index = block.index(), error = %e, "append rolled back");
            return Err(e);
        }

        info!(index = block.index(), hash = %block.hash(), "block appended");
        Ok(block)
    }

    /// Check every block after genesis; stop at the first violation.
    pub fn validate(&self) -> ValidationReport {
        for (position, pair) in self.blocks.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let position = position + 1;

            if let Some(violation) = check_block(position, previous, current) {
                warn!(position, %violation, "chain validation failed");
                return ValidationReport {
                    blocks_checked: position + 1,
                    failure: Some((position, violation)),
                };
            }
        }

        ValidationReport {
            blocks_checked: self.blocks.len(),
            failure: None,
        }
    }

    /// True if [`validate`](Self::validate) finds nothing wrong.
    pub fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }

    /// First non-genesis block whose payload equals `data` exactly.
    pub fn search(&self, data: &str) -> Option<&Block> {
        self.blocks.iter().skip(1).find(|block| block.data() == data)
    }

    /// Validate the chain, then look `data` up.
    pub fn verify(&self, data: &str) -> Verification {
        let report = self.validate();
        if !report.is_valid() {
            return Verification::ChainBroken(report);
        }
        match self.search(data) {
            Some(block) => Verification::Verified(block.clone()),
            None => Verification::NotFound,
        }
    }

    /// All blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    /// Number of blocks, genesis included. Always at least 1.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; present for API symmetry with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Location of the ledger file backing this chain.
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// On-disk records for every block, in order.
    pub fn to_records(&self) -> Vec<BlockRecord> {
        self.blocks.iter().map(Block::to_record).collect()
    }

    fn persist(&self) -> LedgerResult<()> {
        self.store.save(&self.to_records())
    }
}

fn check_block(position: usize, previous: &Block, current: &Block) -> Option<Violation> {
    if current.index() != position as u64 {
        return Some(Violation::IndexMismatch {
            expected: position as u64,
            found: current.index(),
        });
    }

    let computed = current.compute_hash();
    if current.hash() != computed {
        return Some(Violation::HashMismatch {
            stored: current.hash().to_string(),
            computed,
        });
    }

    if current.previous_hash() != previous.hash() {
        return Some(Violation::BrokenLink {
            expected: previous.hash().to_string(),
            found: current.previous_hash().to_string(),
        });
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
