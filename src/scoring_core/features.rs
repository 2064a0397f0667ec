//! Per-wallet feature aggregation

use super::error::ScoringError;
use crate::ingest::{Action, TransactionRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Additive guard for ratio denominators
pub const EPSILON: f64 = 1e-10;
pub const BORROW_RATIO_CAP: f64 = 1000.0;
pub const REPAYMENT_RATIO_CAP: f64 = 10.0;
/// Floor for `activity_duration_hours`
pub const MIN_ACTIVITY_HOURS: f64 = 0.1;

/// Number of numeric columns in a feature vector
pub const FEATURE_COUNT: usize = 15;

/// Fixed-width behavioral summary of one wallet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletFeatures {
    pub wallet: String,
    pub tx_count: u64,
    pub deposit_count: u64,
    pub borrow_count: u64,
    pub repay_count: u64,
    pub liquidation_count: u64,
    pub tx_frequency: f64,
    pub total_deposited: f64,
    pub total_borrowed: f64,
    pub total_repaid: f64,
    pub total_liquidated: f64,
    pub borrow_ratio: f64,
    pub repayment_ratio: f64,
    pub activity_duration_hours: f64,
    pub unique_assets: u64,
    pub avg_tx_amount: f64,
}

impl WalletFeatures {
    /// Column names in the order produced by [`WalletFeatures::to_vector`]
    pub const COLUMNS: [&'static str; FEATURE_COUNT] = [
        "tx_count",
        "deposit_count",
        "borrow_count",
        "repay_count",
        "liquidation_count",
        "tx_frequency",
        "total_deposited",
        "total_borrowed",
        "total_repaid",
        "total_liquidated",
        "borrow_ratio",
        "repayment_ratio",
        "activity_duration_hours",
        "unique_assets",
        "avg_tx_amount",
    ];

    /// Numeric columns only; the wallet id is excluded
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.tx_count as f64,
            self.deposit_count as f64,
            self.borrow_count as f64,
            self.repay_count as f64,
            self.liquidation_count as f64,
            self.tx_frequency,
            self.total_deposited,
            self.total_borrowed,
            self.total_repaid,
            self.total_liquidated,
            self.borrow_ratio,
            self.repayment_ratio,
            self.activity_duration_hours,
            self.unique_assets as f64,
            self.avg_tx_amount,
        ]
    }
}

/// Running totals for one wallet partition
#[derive(Debug, Clone)]
pub struct WalletAccumulator {
    wallet: String,
    tx_count: u64,
    deposit_count: u64,
    borrow_count: u64,
    repay_count: u64,
    liquidation_count: u64,
    total_deposited: f64,
    total_borrowed: f64,
    total_repaid: f64,
    total_liquidated: f64,
    amount_sum: f64,
    first_seen: Option<DateTime<Utc>>,
    last_seen: Option<DateTime<Utc>>,
    assets: HashSet<String>,
}

impl WalletAccumulator {
    pub fn new(wallet: String) -> Self {
        Self {
            wallet,
            tx_count: 0,
            deposit_count: 0,
            borrow_count: 0,
            repay_count: 0,
            liquidation_count: 0,
            total_deposited: 0.0,
            total_borrowed: 0.0,
            total_repaid: 0.0,
            total_liquidated: 0.0,
            amount_sum: 0.0,
            first_seen: None,
            last_seen: None,
            assets: HashSet::new(),
        }
    }

    pub fn add(&mut self, record: &TransactionRecord) {
        self.tx_count += 1;
        self.amount_sum = saturating_add(self.amount_sum, record.amount);

        match record.action {
            Action::Deposit => {
                self.deposit_count += 1;
                self.total_deposited = saturating_add(self.total_deposited, record.amount);
            }
            Action::Borrow => {
                self.borrow_count += 1;
                self.total_borrowed = saturating_add(self.total_borrowed, record.amount);
            }
            Action::Repay => {
                self.repay_count += 1;
                self.total_repaid = saturating_add(self.total_repaid, record.amount);
            }
            Action::Liquidation => {
                self.liquidation_count += 1;
                self.total_liquidated = saturating_add(self.total_liquidated, record.amount);
            }
            Action::Other(_) => {}
        }

        self.first_seen = Some(match self.first_seen {
            Some(t) if t <= record.timestamp => t,
            _ => record.timestamp,
        });
        self.last_seen = Some(match self.last_seen {
            Some(t) if t >= record.timestamp => t,
            _ => record.timestamp,
        });

        if !self.assets.contains(&record.asset) {
            self.assets.insert(record.asset.clone());
        }
    }

    pub fn finish(self) -> WalletFeatures {
        let span_hours = match (self.first_seen, self.last_seen) {
            (Some(first), Some(last)) => (last - first).num_milliseconds() as f64 / 3_600_000.0,
            _ => 0.0,
        };
        let activity_duration_hours = span_hours.max(MIN_ACTIVITY_HOURS);

        let borrow_ratio =
            (self.total_borrowed / (self.total_deposited + EPSILON)).min(BORROW_RATIO_CAP);
        let repayment_ratio =
            (self.total_repaid / (self.total_borrowed + EPSILON)).min(REPAYMENT_RATIO_CAP);

        let avg_tx_amount = if self.tx_count > 0 {
            self.amount_sum / self.tx_count as f64
        } else {
            0.0
        };

        WalletFeatures {
            wallet: self.wallet,
            tx_count: self.tx_count,
            deposit_count: self.deposit_count,
            borrow_count: self.borrow_count,
            repay_count: self.repay_count,
            liquidation_count: self.liquidation_count,
            tx_frequency: self.tx_count as f64 / (activity_duration_hours + 1.0),
            total_deposited: self.total_deposited,
            total_borrowed: self.total_borrowed,
            total_repaid: self.total_repaid,
            total_liquidated: self.total_liquidated,
            borrow_ratio,
            repayment_ratio,
            activity_duration_hours,
            unique_assets: self.assets.len() as u64,
            avg_tx_amount,
        }
    }
}

/// Amounts are finite and non-negative, so only overflow to +inf needs capping
fn saturating_add(total: f64, amount: f64) -> f64 {
    (total + amount).min(f64::MAX)
}

/// Aggregated feature rows, one per wallet, sorted by wallet id.
///
/// Only the aggregator (or [`FeatureTable::from_features`]) can build one, so
/// holding a `FeatureTable` means aggregation has happened for this run.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    rows: Vec<WalletFeatures>,
}

impl FeatureTable {
    /// Wrap precomputed rows. Rows are sorted by wallet; an empty set is
    /// rejected like an empty ledger, and a wallet may appear only once.
    pub fn from_features(mut rows: Vec<WalletFeatures>) -> Result<Self, ScoringError> {
        if rows.is_empty() {
            return Err(ScoringError::EmptyInput);
        }
        rows.sort_by(|a, b| a.wallet.cmp(&b.wallet));
        if let Some(pair) = rows.windows(2).find(|pair| pair[0].wallet == pair[1].wallet) {
            return Err(ScoringError::DuplicateWallet(pair[0].wallet.clone()));
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, wallet: &str) -> Option<&WalletFeatures> {
        self.rows
            .binary_search_by(|row| row.wallet.as_str().cmp(wallet))
            .ok()
            .map(|idx| &self.rows[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &WalletFeatures> {
        self.rows.iter()
    }

    pub fn wallets(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.wallet.as_str())
    }

    /// Feature matrix: rows = wallets (table order), columns = [`WalletFeatures::COLUMNS`]
    pub fn matrix(&self) -> Vec<[f64; FEATURE_COUNT]> {
        self.rows.iter().map(WalletFeatures::to_vector).collect()
    }
}

pub struct FeatureAggregator;

impl FeatureAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Partition records by wallet and reduce each partition to a feature row
    pub fn aggregate(&self, records: &[TransactionRecord]) -> Result<FeatureTable, ScoringError> {
        if records.is_empty() {
            return Err(ScoringError::EmptyInput);
        }

        let mut partitions: BTreeMap<&str, WalletAccumulator> = BTreeMap::new();
        for record in records {
            partitions
                .entry(record.wallet.as_str())
                .or_insert_with(|| WalletAccumulator::new(record.wallet.clone()))
                .add(record);
        }

        let rows: Vec<WalletFeatures> = partitions
            .into_values()
            .map(WalletAccumulator::finish)
            .collect();

        log::debug!(
            "Aggregated {} transactions into {} wallet feature rows",
            records.len(),
            rows.len()
        );

        Ok(FeatureTable { rows })
    }
}
