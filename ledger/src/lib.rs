// Copyright (c) 2026 certchain contributors. MIT License.
// See LICENSE for details.

//! # certchain ledger library
//!
//! An append-only, tamper-evident ledger for certificate fingerprints.
//! Each fingerprint becomes a block; each block carries the SHA-256 of its
//! own content and the hash of the block before it, so editing any
//! recorded entry is detectable.
//!
//! This is a single-writer, local integrity log. There is no consensus, no
//! replication, and no block signing.
//!
//! ## Modules
//!
//! - **storage**: Block, Chain, and the JSON ledger file.
//! - **hash**: SHA-256 helpers and the one block digest definition.
//! - **certificate**: Canonical fingerprints for extracted certificate fields.
//! - **config**: Genesis marker, timestamp format, file defaults.
//! - **error**: `LedgerError`.
//!
//! ## Example
//!
//! ```no_run
//! use certchain_ledger::{Chain, Verification};
//!
//! # fn main() -> certchain_ledger::LedgerResult<()> {
//! let mut chain = Chain::open("blockchain_data.json")?;
//! let block = chain.append("9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08")?;
//! println!("recorded in block #{}", block.index());
//!
//! match chain.verify(block.data()) {
//!     Verification::Verified(b) => println!("found in block #{}", b.index()),
//!     Verification::NotFound => println!("not recorded"),
//!     Verification::ChainBroken(report) => println!("ledger tampered: {report}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod certificate;
pub mod config;
pub mod error;
pub mod hash;
pub mod storage;

pub use certificate::{CertificateRecord, ExtractedCertificate};
pub use error::{LedgerError, LedgerResult};
pub use storage::{Block, BlockRecord, Chain, LedgerFile, ValidationReport, Verification, Violation};
