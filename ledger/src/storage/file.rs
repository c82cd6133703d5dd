//! # LedgerFile: Durable Storage
//!
//! The persistence layer for the ledger: one JSON array on disk, one
//! element per block, in chain order.
//!
//! ## Atomicity
//!
//! A save never edits the ledger in place. The full array is written to a
//! sibling `<name>.tmp` file, flushed and synced, then renamed over the
//! ledger. Rename within a directory is atomic on the platforms we target,
//! so a reader (or a restart after a crash) sees either the old file or the
//! new one, never a truncated mix.
//!
//! ## Trust on load
//!
//! [`LedgerFile::load`] checks shape only: valid JSON, an array, every
//! field present with the right type, at least one element. It does not
//! recompute a single hash. That is [`Chain::validate`](super::Chain::validate)'s job.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use super::block::BlockRecord;
use crate::config::{JSON_INDENT, TEMP_FILE_EXTENSION};
use crate::error::{LedgerError, LedgerResult};

/// Handle to the ledger file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerFile {
    path: PathBuf,
}

impl LedgerFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the staging file a save writes before swapping it in.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("ledger"));
        name.push(".");
        name.push(TEMP_FILE_EXTENSION);
        self.path.with_file_name(name)
    }

    /// Whether the ledger file is present.
    ///
    /// A missing file is `Ok(false)`. Anything else that stops us from
    /// finding out (permissions, a dangling mount) is reported rather than
    /// treated as absence, so we never create a fresh genesis on top of a
    /// ledger we merely failed to see.
    pub fn exists(&self) -> LedgerResult<bool> {
        match fs::metadata(&self.path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(LedgerError::StorageUnavailable {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Read and parse the stored block records, in file order.
    pub fn load(&self) -> LedgerResult<Vec<BlockRecord>> {
        let bytes = fs::read(&self.path).map_err(|source| LedgerError::StorageUnavailable {
            path: self.path.clone(),
            source,
        })?;

        let records: Vec<BlockRecord> =
            serde_json::from_slice(&bytes).map_err(|e| self.corrupt(e.to_string()))?;

        if records.is_empty() {
            return Err(self.corrupt("ledger holds no blocks".to_string()));
        }

        debug!(path = %self.path.display(), blocks = records.len(), "ledger loaded");
        Ok(records)
    }

    /// Replace the stored ledger with `records`.
    pub fn save(&self, records: &[BlockRecord]) -> LedgerResult<()> {
        let bytes = encode(records)?;
        let tmp_path = self.temp_path();

        if let Err(source) = self.write_and_swap(&tmp_path, &bytes) {
            // Best effort: the staging file may not exist if creation failed.
            let _ = fs::remove_file(&tmp_path);
            return Err(LedgerError::Persistence {
                path: self.path.clone(),
                source,
            });
        }

        self.sync_parent_dir();
        debug!(path = %self.path.display(), blocks = records.len(), "ledger saved");
        Ok(())
    }

    fn write_and_swap(&self, tmp_path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        {
            let mut file = File::create(tmp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }

        fs::rename(tmp_path, &self.path)
    }

    /// Make the rename itself durable. By the time this runs the new file
    /// is already in place, so a failure here is logged, not returned.
    #[cfg(unix)]
    fn sync_parent_dir(&self) {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
            warn!(dir = %parent.display(), error = %e, "failed to sync ledger directory");
        }
    }

    #[cfg(not(unix))]
    fn sync_parent_dir(&self) {}

    fn corrupt(&self, reason: String) -> LedgerError {
        LedgerError::StorageCorrupt {
            path: self.path.clone(),
            reason,
        }
    }
}

/// Pretty-print the records with the ledger's fixed indentation.
fn encode(records: &[BlockRecord]) -> LedgerResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(records.len() * 256);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    Ok(buf)
}
