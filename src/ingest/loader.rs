//! Ledger file loader
//!
//! Reads either a JSON array of transactions or JSONL (one transaction per
//! line). Entries that cannot be coerced are dropped with a warning; only
//! file-level problems fail the load.

use super::error::IngestError;
use super::record::{RawTransaction, TransactionRecord};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Counters describing one load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub total_records: usize,
    pub accepted: usize,
    pub dropped: usize,
    pub unique_wallets: usize,
}

#[derive(Debug, Clone)]
pub struct LoadedTransactions {
    pub records: Vec<TransactionRecord>,
    pub stats: LoadStats,
}

pub struct TransactionLoader {
    path: PathBuf,
}

impl TransactionLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and normalize the whole file
    pub async fn load(&self) -> Result<LoadedTransactions, IngestError> {
        log::info!("📖 Loading transaction data: {}", self.path.display());
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let loaded = Self::parse_str(&contents)?;

        log::info!(
            "✅ Loaded {} transactions for {} unique wallets ({} dropped)",
            loaded.stats.accepted,
            loaded.stats.unique_wallets,
            loaded.stats.dropped
        );
        Ok(loaded)
    }

    /// Parse file contents. A leading `[` selects JSON-array mode, anything
    /// else is treated as JSONL.
    pub fn parse_str(contents: &str) -> Result<LoadedTransactions, IngestError> {
        let trimmed = contents.trim_start();

        let entries: Vec<Option<Value>> = if trimmed.starts_with('[') {
            let values: Vec<Value> = serde_json::from_str(trimmed)?;
            values.into_iter().map(Some).collect()
        } else {
            trimmed
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| match serde_json::from_str::<Value>(line) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        log::warn!("Failed to parse ledger line: {} ({})", line, e);
                        None
                    }
                })
                .collect()
        };

        let mut stats = LoadStats {
            total_records: entries.len(),
            ..LoadStats::default()
        };
        let mut records = Vec::with_capacity(entries.len());

        for (index, entry) in entries.into_iter().enumerate() {
            match entry.map(normalize_entry) {
                Some(Ok(record)) => records.push(record),
                Some(Err(e)) => log::warn!("Dropping record #{}: {}", index, e),
                None => {}
            }
        }

        stats.accepted = records.len();
        stats.dropped = stats.total_records - stats.accepted;
        stats.unique_wallets = records
            .iter()
            .map(|r| r.wallet.as_str())
            .collect::<HashSet<_>>()
            .len();

        Ok(LoadedTransactions { records, stats })
    }
}

fn normalize_entry(value: Value) -> Result<TransactionRecord, IngestError> {
    if !value.is_object() {
        return Err(IngestError::InvalidRecord(format!(
            "expected an object, got {}",
            value
        )));
    }
    let raw: RawTransaction = serde_json::from_value(value)?;
    TransactionRecord::from_raw(raw)
}
