//! Decision Ledger
//!
//! Append-only JSONL ledger of negotiation records. Each entry carries the
//! SHA-256 of its predecessor's hash plus its own record, so any edit to an
//! earlier line breaks every later hash.

use isct_events::{LedgerEntry, NegotiationRecord, GENESIS_HASH};
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ledger chain broken at entry {sequence}")]
    ChainBroken { sequence: u64 },
}

/// Hash of an entry given its predecessor's hash
pub fn entry_hash(prev_hash: &str, record: &NegotiationRecord) -> Result<String, LedgerError> {
    let mut hasher = Sha256::new();
    hasher.update(prev_hash.as_bytes());
    hasher.update(serde_json::to_vec(record)?);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Append-only ledger writer
pub struct DecisionLedger {
    writer: Option<BufWriter<File>>,
    entry_count: u64,
    last_hash: String,
}

impl DecisionLedger {
    /// Create a new ledger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            entry_count: 0,
            last_hash: GENESIS_HASH.to_string(),
        })
    }

    /// Create a ledger that only tracks the chain (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            entry_count: 0,
            last_hash: GENESIS_HASH.to_string(),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Hash of the most recent entry, or the genesis hash
    pub fn head(&self) -> &str {
        &self.last_hash
    }

    /// Chain and append a record
    pub fn append(&mut self, record: NegotiationRecord) -> Result<LedgerEntry, LedgerError> {
        let hash = entry_hash(&self.last_hash, &record)?;
        let entry = LedgerEntry {
            sequence: self.entry_count + 1,
            prev_hash: std::mem::replace(&mut self.last_hash, hash.clone()),
            hash,
            record,
        };
        self.entry_count += 1;

        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(&entry)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(entry)
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for DecisionLedger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush decision ledger: {}", e);
        }
    }
}

/// Check every link of a ledger; returns the number of entries
pub fn verify_chain(reader: impl BufRead) -> Result<u64, LedgerError> {
    let mut expected_prev = GENESIS_HASH.to_string();
    let mut count = 0u64;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: LedgerEntry = serde_json::from_str(&line)?;
        count += 1;

        let recomputed = entry_hash(&entry.prev_hash, &entry.record)?;
        if entry.sequence != count || entry.prev_hash != expected_prev || entry.hash != recomputed {
            return Err(LedgerError::ChainBroken { sequence: count });
        }
        expected_prev = entry.hash;
    }
    Ok(count)
}
