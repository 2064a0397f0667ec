//! Summary statistics over a score table

use crate::scoring_core::ScoreTable;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl ScoreSummary {
    pub fn from_scores(scores: &ScoreTable) -> Option<Self> {
        let mut values: Vec<f64> = scores.iter().map(|s| s.credit_score).collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(|a, b| a.total_cmp(b));

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (values[count / 2 - 1] + values[count / 2]) / 2.0
        } else {
            values[count / 2]
        };

        Some(Self {
            count,
            min: values[0],
            max: values[count - 1],
            mean,
            median,
        })
    }
}
