//! Credit score computation from the wallet feature table

use super::features::{FeatureTable, FEATURE_COUNT};
use super::normalizer::{min_max_rescale, MinMaxScaler};
use serde::Serialize;

/// Upper bound of the public score range
pub const MAX_CREDIT_SCORE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletScore {
    pub wallet: String,
    pub credit_score: f64,
}

/// Final `(wallet, credit_score)` table, in feature-table order
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    scores: Vec<WalletScore>,
}

impl ScoreTable {
    pub fn new(scores: Vec<WalletScore>) -> Self {
        Self { scores }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn get(&self, wallet: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.wallet == wallet)
            .map(|s| s.credit_score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WalletScore> {
        self.scores.iter()
    }
}

/// Equal-weight min-max scorer
///
/// 1. Min-max scale each feature column across all wallets
/// 2. Sum the scaled columns (every feature weighs the same)
/// 3. Min-max rescale the sums onto [0, 1000]
///
/// Constant columns and a constant composite both resolve to 0.
pub struct ScoreNormalizer;

impl ScoreNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Unweighted sum of min-max scaled features, one per wallet
    pub fn composite_scores(&self, features: &FeatureTable) -> Vec<f64> {
        let matrix = features.matrix();
        let scaler = match MinMaxScaler::<FEATURE_COUNT>::fit(&matrix) {
            Some(scaler) => scaler,
            None => return Vec::new(),
        };

        matrix
            .iter()
            .map(|row| scaler.transform(row).iter().sum::<f64>())
            .collect()
    }

    pub fn score(&self, features: &FeatureTable) -> ScoreTable {
        let composite = self.composite_scores(features);
        let rescaled = min_max_rescale(&composite, MAX_CREDIT_SCORE);

        let scores = features
            .wallets()
            .zip(rescaled)
            .map(|(wallet, score)| WalletScore {
                wallet: wallet.to_string(),
                credit_score: score.clamp(0.0, MAX_CREDIT_SCORE),
            })
            .collect();

        log::debug!("Scored {} wallets", features.len());
        ScoreTable::new(scores)
    }
}
