//! # Storage Module
//!
//! The hash-chained ledger itself: blocks, the chain that links them, and
//! the file the chain is persisted in.
//!
//! ## Architecture
//!
//! ```text
//! block.rs : Block and its on-disk BlockRecord, genesis, hash recomputation
//! chain.rs : Chain: open/load/append/validate/search/verify
//! file.rs  : LedgerFile: JSON array on disk, atomic temp-file + rename saves
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! fingerprint → Chain::append → Block → LedgerFile::save
//!                                          ↓
//!                               blockchain_data.json
//!                                          ↓
//! LedgerFile::load → BlockRecord → Block → Chain::validate / Chain::search
//! ```

pub mod block;
pub mod chain;
pub mod file;

pub use block::{Block, BlockRecord};
pub use chain::{Chain, ValidationReport, Verification, Violation};
pub use file::LedgerFile;
