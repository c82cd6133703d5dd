//! End-to-end tests for the certchain ledger.
//!
//! These exercise the whole path a certificate takes: fingerprinting,
//! appending, persisting, reopening, verifying, and detecting tampering.
//! Every test gets its own temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use certchain_ledger::config::{GENESIS_DATA, GENESIS_PREVIOUS_HASH};
use certchain_ledger::{
    BlockRecord, CertificateRecord, Chain, ExtractedCertificate, LedgerError, Verification,
};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn ledger_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("blockchain_data.json");
    (dir, path)
}

fn read_records(path: &Path) -> Vec<BlockRecord> {
    let bytes = fs::read(path).expect("read ledger");
    serde_json::from_slice(&bytes).expect("parse ledger")
}

fn write_records(path: &Path, records: &[BlockRecord]) {
    fs::write(path, serde_json::to_vec_pretty(records).expect("encode")).expect("write ledger");
}

/// Flip one character of `s` to a different character of the same class.
fn flip_char(s: &str, at: usize) -> String {
    s.chars()
        .enumerate()
        .map(|(i, c)| if i == at { if c == 'a' { 'b' } else { 'a' } } else { c })
        .collect()
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

#[test]
fn issue_and_verify_scenario() {
    let (_dir, path) = ledger_path();

    let mut chain = Chain::open(&path).expect("open");
    let genesis = chain.latest().clone();
    assert_eq!(genesis.index(), 0);
    assert_eq!(genesis.previous_hash(), GENESIS_PREVIOUS_HASH);
    assert_eq!(genesis.data(), GENESIS_DATA);

    let b1 = chain.append("abc123").expect("append abc123");
    assert_eq!(b1.index(), 1);
    assert_eq!(b1.previous_hash(), genesis.hash());

    let b2 = chain.append("def456").expect("append def456");
    assert_eq!(b2.index(), 2);
    assert_eq!(b2.previous_hash(), b1.hash());

    assert_eq!(chain.search("def456").map(|b| b.index()), Some(2));
    assert!(chain.search("zzz").is_none());
    assert!(chain.is_valid());

    // Corrupt block 1's stored data behind the chain's back.
    let mut records = read_records(&path);
    records[1].data = "abc999".to_string();
    write_records(&path, &records);

    let reopened = Chain::open(&path).expect("reopen");
    assert!(!reopened.is_valid());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn append_sets_index_and_link() {
    let (_dir, path) = ledger_path();
    let mut chain = Chain::open(&path).expect("open");

    for i in 0..25 {
        let prior_len = chain.len();
        let prior_tail = chain.latest().hash().to_string();
        let block = chain.append(format!("payload-{i}")).expect("append");

        assert_eq!(block.index(), prior_len as u64);
        assert_eq!(block.previous_hash(), prior_tail);
        assert!(chain.is_valid());
    }
}

#[test]
fn every_appended_payload_is_found() {
    let (_dir, path) = ledger_path();
    let mut chain = Chain::open(&path).expect("open");
    let payloads: Vec<String> = (0..12).map(|i| format!("{i:064x}")).collect();

    for p in &payloads {
        chain.append(p.clone()).expect("append");
    }

    for p in &payloads {
        let block = chain.search(p).expect("appended payload must be found");
        assert_eq!(block.data(), p);
    }
    assert!(chain.search(&format!("{:064x}", 999)).is_none());
}

#[test]
fn any_single_flip_in_data_or_link_is_detected() {
    let (_dir, path) = ledger_path();
    let mut chain = Chain::open(&path).expect("open");
    for p in ["abc123", "def456", "0123abcd"] {
        chain.append(p).expect("append");
    }
    let pristine = read_records(&path);

    for position in 1..pristine.len() {
        let data_len = pristine[position].data.chars().count();
        for at in 0..data_len {
            let mut records = pristine.clone();
            records[position].data = flip_char(&records[position].data, at);
            write_records(&path, &records);
            assert!(
                !Chain::open(&path).expect("reopen").is_valid(),
                "data flip at block {position} char {at} went unnoticed"
            );
        }

        let link_len = pristine[position].previous_hash.chars().count();
        for at in 0..link_len {
            let mut records = pristine.clone();
            records[position].previous_hash = flip_char(&records[position].previous_hash, at);
            write_records(&path, &records);
            assert!(
                !Chain::open(&path).expect("reopen").is_valid(),
                "previous_hash flip at block {position} char {at} went unnoticed"
            );
        }
    }
}

#[test]
fn persisted_chain_roundtrips_exactly() {
    let (_dir, path) = ledger_path();
    let mut chain = Chain::open(&path).expect("open");
    chain.append("abc123").expect("append");
    chain.append("def456").expect("append");

    let reopened = Chain::open(&path).expect("reopen");
    assert_eq!(reopened.len(), chain.len());
    for (a, b) in chain.blocks().iter().zip(reopened.blocks()) {
        assert_eq!(a.index(), b.index());
        assert_eq!(a.timestamp(), b.timestamp());
        assert_eq!(a.data(), b.data());
        assert_eq!(a.previous_hash(), b.previous_hash());
        assert_eq!(a.hash(), b.hash());
    }
}

// ---------------------------------------------------------------------------
// Storage behaviour
// ---------------------------------------------------------------------------

#[test]
fn reopening_does_not_rewrite_file() {
    let (_dir, path) = ledger_path();
    {
        let mut chain = Chain::open(&path).expect("open");
        chain.append("abc123").expect("append");
    }
    let before = fs::read(&path).expect("read");

    let chain = Chain::open(&path).expect("reopen");
    assert_eq!(chain.len(), 2);
    assert_eq!(fs::read(&path).expect("read"), before);
}

#[test]
fn load_trusts_stored_hashes() {
    let (_dir, path) = ledger_path();
    {
        let mut chain = Chain::open(&path).expect("open");
        chain.append("abc123").expect("append");
    }
    let mut records = read_records(&path);
    records[1].hash = "f".repeat(64);
    write_records(&path, &records);

    // Loading succeeds and keeps the forged hash; only validation objects.
    let chain = Chain::open(&path).expect("reopen");
    assert_eq!(chain.latest().hash(), "f".repeat(64));
    assert!(!chain.is_valid());
}

#[test]
fn append_after_reopen_continues_chain() {
    let (_dir, path) = ledger_path();
    let tail_hash = {
        let mut chain = Chain::open(&path).expect("open");
        chain.append("abc123").expect("append").hash().to_string()
    };

    let mut chain = Chain::open(&path).expect("reopen");
    let block = chain.append("def456").expect("append");
    assert_eq!(block.index(), 2);
    assert_eq!(block.previous_hash(), tail_hash);
    assert!(chain.is_valid());
}

#[test]
fn corrupt_file_is_reported() {
    let (_dir, path) = ledger_path();
    fs::write(&path, b"[{\"index\": \"zero\"}]").expect("write");

    match Chain::open(&path).unwrap_err() {
        LedgerError::StorageCorrupt { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected StorageCorrupt, got {other}"),
    }
}

#[test]
fn reads_ledger_written_by_earlier_deployments() {
    let (_dir, path) = ledger_path();
    // Hashes computed independently with SHA-256 over index||timestamp||data||previous_hash.
    let genesis = certchain_ledger::hash::sha256_hex(b"013/05/2025 10:15:02Genesis Block0");
    let block1 = certchain_ledger::hash::sha256_hex(
        format!("113/05/2025 10:20:44abc123{genesis}").as_bytes(),
    );
    let json = format!(
        r#"[
    {{
        "index": 0,
        "timestamp": "13/05/2025 10:15:02",
        "data": "Genesis Block",
        "previous_hash": "0",
        "hash": "{genesis}"
    }},
    {{
        "index": 1,
        "timestamp": "13/05/2025 10:20:44",
        "data": "abc123",
        "previous_hash": "{genesis}",
        "hash": "{block1}"
    }}
]"#
    );
    fs::write(&path, json).expect("write");

    let chain = Chain::open(&path).expect("open");
    assert!(chain.is_valid());
    assert_eq!(chain.search("abc123").map(|b| b.index()), Some(1));
}

// ---------------------------------------------------------------------------
// Certificates
// ---------------------------------------------------------------------------

#[test]
fn certificate_issue_and_verify() {
    let (_dir, path) = ledger_path();
    let mut chain = Chain::open(&path).expect("open");

    let record = CertificateRecord {
        degree_serial: "2023045678901".to_string(),
        enrollment_no: "AB-12345".to_string(),
        roll_no: "1904512".to_string(),
        name: "Asha Verma".to_string(),
        degree: "Bachelor of Technology".to_string(),
        cgpa: "8.72".to_string(),
        passing_year: "2023".to_string(),
        issue_date: "14th August 2023".to_string(),
    };
    let issued = ExtractedCertificate::from_record(record.clone());
    chain.append(issued.payload()).expect("append");

    // A re-scan with different capitalisation yields the same fingerprint.
    let mut rescanned = record;
    rescanned.name = "ASHA VERMA".to_string();
    let presented = ExtractedCertificate::from_record(rescanned);

    match chain.verify(&presented.payload()) {
        Verification::Verified(block) => assert_eq!(block.index(), 1),
        other => panic!("expected Verified, got {other:?}"),
    }

    let mut forged = presented.record.clone();
    forged.cgpa = "9.99".to_string();
    assert_eq!(chain.verify(&forged.fingerprint()), Verification::NotFound);
}
