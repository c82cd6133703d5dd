//! # Certificate Fingerprints
//!
//! The ledger stores opaque strings. For certificates, that string is a
//! fingerprint derived from the fields an extraction pipeline reads off the
//! document. The pipeline (OCR, image cleanup, pattern matching) lives
//! outside this crate; what lives here is the canonical rule that turns its
//! field values into a fingerprint, so any caller holding the fields derives
//! the same payload.
//!
//! ## Canonical form
//!
//! ```text
//! lower( degree_serial | enrollment_no | roll_no | name | cgpa | passing_year | degree )
//! ```
//!
//! hashed with SHA-256 and hex-encoded. `issue_date` is display-only and not
//! part of the fingerprint.

use serde::{Deserialize, Serialize};

use crate::config::{FIELD_NOT_FOUND, FINGERPRINT_FIELD_SEPARATOR};
use crate::hash::sha256_hex;

fn not_found() -> String {
    FIELD_NOT_FOUND.to_string()
}

/// Fields extracted from one certificate.
///
/// Any field the extractor could not read holds [`FIELD_NOT_FOUND`]; a
/// field absent from a JSON input defaults to it as well.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    #[serde(default = "not_found")]
    pub degree_serial: String,
    #[serde(default = "not_found")]
    pub enrollment_no: String,
    #[serde(default = "not_found")]
    pub roll_no: String,
    #[serde(default = "not_found")]
    pub name: String,
    #[serde(default = "not_found")]
    pub degree: String,
    #[serde(default = "not_found")]
    pub cgpa: String,
    #[serde(default = "not_found")]
    pub passing_year: String,
    #[serde(default = "not_found")]
    pub issue_date: String,
}

impl Default for CertificateRecord {
    fn default() -> Self {
        Self {
            degree_serial: not_found(),
            enrollment_no: not_found(),
            roll_no: not_found(),
            name: not_found(),
            degree: not_found(),
            cgpa: not_found(),
            passing_year: not_found(),
            issue_date: not_found(),
        }
    }
}

impl CertificateRecord {
    /// The lower-cased, separator-joined string that gets hashed.
    pub fn canonical_string(&self) -> String {
        [
            self.degree_serial.as_str(),
            self.enrollment_no.as_str(),
            self.roll_no.as_str(),
            self.name.as_str(),
            self.cgpa.as_str(),
            self.passing_year.as_str(),
            self.degree.as_str(),
        ]
        .join(FINGERPRINT_FIELD_SEPARATOR)
        .to_lowercase()
    }

    /// SHA-256 of the canonical string, lower-case hex.
    pub fn fingerprint(&self) -> String {
        sha256_hex(self.canonical_string().as_bytes())
    }

    /// Names of fingerprinted fields the extractor failed to read.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("degree_serial", &self.degree_serial),
            ("enrollment_no", &self.enrollment_no),
            ("roll_no", &self.roll_no),
            ("name", &self.name),
            ("cgpa", &self.cgpa),
            ("passing_year", &self.passing_year),
            ("degree", &self.degree),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_str() == FIELD_NOT_FOUND)
        .map(|(field, _)| field)
        .collect()
    }
}

/// What an extraction pipeline hands over: the fields, plus the `hash` it
/// computed from them when it computed one. Only the payload is recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedCertificate {
    #[serde(flatten)]
    pub record: CertificateRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl ExtractedCertificate {
    /// Wrap a record with the fingerprint computed here.
    pub fn from_record(record: CertificateRecord) -> Self {
        let hash = Some(record.fingerprint());
        Self { record, hash }
    }

    /// The payload to append or search for: the supplied `hash` if there is
    /// one, otherwise the fingerprint of the fields.
    pub fn payload(&self) -> String {
        match &self.hash {
            Some(hash) => hash.clone(),
            None => self.record.fingerprint(),
        }
    }

    /// False only when a supplied `hash` disagrees with the recorded fields.
    pub fn hash_matches(&self) -> bool {
        self.hash
            .as_deref()
            .map_or(true, |hash| hash == self.record.fingerprint())
    }
}
