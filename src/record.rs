//! JSON lines record files and the JSON reports printed by the commands.

use std::io::BufRead;

use base64::{engine::general_purpose::STANDARD, Engine};
use recovery::{HashAlgorithm, RecoveredKey, RecoveryReport, SignatureRecord, SignerId};
use serde::{Deserialize, Serialize};

use crate::error::Sig2RsaError;

/// One line of a record file, as written by the header extractor.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RecordLine {
    pub domain: String,
    pub selector: String,
    /// `rsa-sha256`, `sha1`, ...
    pub algorithm: String,
    /// base64 of the canonicalized signed bytes
    pub data: String,
    /// base64 of the signature octet string
    pub signature: String,
    #[serde(default)]
    pub exponent: Option<u32>,
}

impl RecordLine {
    fn into_record(self, line: usize) -> Result<SignatureRecord, Sig2RsaError> {
        let hash = self
            .algorithm
            .parse::<HashAlgorithm>()
            .map_err(|reason| Sig2RsaError::UnsupportedAlgorithm { line, reason })?;
        let data = decode_base64(&self.data, line, "data")?;
        let signature = decode_base64(&self.signature, line, "signature")?;

        let record = SignatureRecord::from_signature_bytes(
            data,
            signature.as_slice(),
            hash,
            SignerId::new(self.domain, self.selector),
        );

        Ok(match self.exponent {
            Some(e) => record.with_exponent_hint(e),
            None => record,
        })
    }
}

fn decode_base64(s: &str, line: usize, field: &'static str) -> Result<Vec<u8>, Sig2RsaError> {
    // DKIM `b=` values may be folded
    let s = s.split_whitespace().collect::<String>();
    STANDARD
        .decode(s.as_bytes())
        .map_err(|e| Sig2RsaError::InvalidBase64 {
            line,
            field,
            reason: e.to_string(),
        })
}

/// Read every record of a JSON lines file, blank lines are skipped. Line numbers start at 1.
pub fn read_records<R: BufRead>(reader: R) -> anyhow::Result<Vec<SignatureRecord>> {
    let mut records = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record_line = serde_json::from_str::<RecordLine>(&line).map_err(|e| {
            Sig2RsaError::InvalidRecordLine {
                line: i + 1,
                reason: e.to_string(),
            }
        })?;
        records.push(record_line.into_record(i + 1)?);
    }

    Ok(records)
}

/// Four base64 lines: data1, signature1, data2, signature2.
pub fn read_pair<R: BufRead>(reader: R) -> anyhow::Result<[Vec<u8>; 4]> {
    let mut lines = Vec::with_capacity(4);
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }

    let lines: [String; 4] = lines
        .try_into()
        .map_err(|l: Vec<String>| Sig2RsaError::InvalidPairInput(l.len()))?;

    let fields = ["data1", "signature1", "data2", "signature2"];
    let mut decoded: [Vec<u8>; 4] = Default::default();
    for (i, (line, field)) in lines.iter().zip(fields).enumerate() {
        decoded[i] = decode_base64(line, i + 1, field)?;
    }

    Ok(decoded)
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyReport {
    pub domain: String,
    pub selector: String,
    pub bits: usize,
    pub exponent: u32,
    pub modulus: String,
    pub verified_count: usize,
}

impl From<&RecoveredKey> for KeyReport {
    fn from(key: &RecoveredKey) -> Self {
        Self {
            domain: key.source_group().domain.clone(),
            selector: key.source_group().selector.clone(),
            bits: key.bit_length(),
            exponent: key.exponent(),
            modulus: key.modulus_hex(),
            verified_count: key.verified_count(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureReport {
    pub domain: String,
    pub selector: String,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    pub keys: Vec<KeyReport>,
    pub failures: Vec<FailureReport>,
}

impl From<&RecoveryReport> for Report {
    fn from(report: &RecoveryReport) -> Self {
        Self {
            keys: report.keys.iter().map(KeyReport::from).collect(),
            failures: report
                .failures
                .iter()
                .map(|f| FailureReport {
                    domain: f.signer.domain.clone(),
                    selector: f.signer.selector.clone(),
                    reason: f.reason.to_string(),
                })
                .collect(),
        }
    }
}

/// The pair mode output, `0x0` for both fields when no key was recovered.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairReport {
    pub n_hex: String,
    pub e_hex: String,
}

impl From<Option<&RecoveredKey>> for PairReport {
    fn from(key: Option<&RecoveredKey>) -> Self {
        match key {
            Some(key) => Self {
                n_hex: key.modulus_hex(),
                e_hex: key.exponent_hex(),
            },
            None => Self {
                n_hex: "0x0".to_string(),
                e_hex: "0x0".to_string(),
            },
        }
    }
}
