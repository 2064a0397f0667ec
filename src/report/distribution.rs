//! Score distribution buckets and text histogram

use crate::scoring_core::{ScoreTable, MAX_CREDIT_SCORE};
use serde::Serialize;

pub const BUCKET_WIDTH: u32 = 100;
pub const BUCKET_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    /// e.g. "300-399"
    pub score_range: String,
    pub count: usize,
}

/// Wallet counts per fixed-width score range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDistribution {
    buckets: Vec<ScoreBucket>,
}

impl ScoreDistribution {
    pub fn from_scores(scores: &ScoreTable) -> Self {
        let mut buckets: Vec<ScoreBucket> = (0..BUCKET_COUNT as u32)
            .map(|i| {
                let lower = i * BUCKET_WIDTH;
                ScoreBucket {
                    score_range: format!("{}-{}", lower, lower + BUCKET_WIDTH - 1),
                    count: 0,
                }
            })
            .collect();

        for score in scores.iter() {
            buckets[Self::bucket_index(score.credit_score)].count += 1;
        }

        Self { buckets }
    }

    /// Bucket for a score; lower bounds are inclusive. A perfect 1000 lands
    /// in the top bucket so every wallet is counted.
    pub fn bucket_index(score: f64) -> usize {
        let clamped = score.clamp(0.0, MAX_CREDIT_SCORE);
        ((clamped / BUCKET_WIDTH as f64) as usize).min(BUCKET_COUNT - 1)
    }

    pub fn buckets(&self) -> &[ScoreBucket] {
        &self.buckets
    }

    pub fn count(&self, score_range: &str) -> Option<usize> {
        self.buckets
            .iter()
            .find(|b| b.score_range == score_range)
            .map(|b| b.count)
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// One bar per bucket, scaled so the fullest bucket is `width` chars
    pub fn render_histogram(&self, width: usize) -> String {
        let peak = self.buckets.iter().map(|b| b.count).max().unwrap_or(0);
        let mut out = String::from("Credit Score Distribution\n");

        for bucket in &self.buckets {
            let bar_len = if peak > 0 {
                ((bucket.count as f64 / peak as f64) * width as f64).round() as usize
            } else {
                0
            };
            out.push_str(&format!(
                "{:>7} | {:<width$} {}\n",
                bucket.score_range,
                "#".repeat(bar_len),
                bucket.count,
                width = width
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring_core::WalletScore;

    fn table(scores: &[f64]) -> ScoreTable {
        ScoreTable::new(
            scores
                .iter()
                .enumerate()
                .map(|(i, s)| WalletScore {
                    wallet: format!("w{}", i),
                    credit_score: *s,
                })
                .collect(),
        )
    }

    #[test]
    fn test_bucket_labels() {
        let dist = ScoreDistribution::from_scores(&table(&[]));
        let labels: Vec<&str> = dist.buckets().iter().map(|b| b.score_range.as_str()).collect();

        assert_eq!(labels.len(), 10);
        assert_eq!(labels[0], "0-99");
        assert_eq!(labels[4], "400-499");
        assert_eq!(labels[9], "900-999");
        assert_eq!(dist.total(), 0);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(ScoreDistribution::bucket_index(0.0), 0);
        assert_eq!(ScoreDistribution::bucket_index(99.999), 0);
        assert_eq!(ScoreDistribution::bucket_index(100.0), 1);
        assert_eq!(ScoreDistribution::bucket_index(999.9), 9);
        assert_eq!(ScoreDistribution::bucket_index(1000.0), 9);
    }

    #[test]
    fn test_counts_every_wallet() {
        let dist = ScoreDistribution::from_scores(&table(&[0.0, 50.0, 150.0, 999.0, 1000.0]));

        assert_eq!(dist.total(), 5);
        assert_eq!(dist.count("0-99"), Some(2));
        assert_eq!(dist.count("100-199"), Some(1));
        assert_eq!(dist.count("900-999"), Some(2));
        assert_eq!(dist.count("1000-1099"), None);
    }

    #[test]
    fn test_histogram_scaling() {
        let dist = ScoreDistribution::from_scores(&table(&[10.0, 20.0, 30.0, 40.0, 510.0, 520.0]));
        let rendered = dist.render_histogram(8);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 11);
        assert!(lines[1].contains("########"));
        assert!(lines[1].trim_end().ends_with('4'));
        assert!(lines[6].contains("####"));
        assert!(!lines[6].contains("#####"));
    }
}
