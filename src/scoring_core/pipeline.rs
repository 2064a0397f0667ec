//! Aggregate-then-score orchestration

use super::error::ScoringError;
use super::features::{FeatureAggregator, FeatureTable};
use super::scorer::{ScoreNormalizer, ScoreTable};
use crate::ingest::TransactionRecord;

/// Both tables produced by one run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub features: FeatureTable,
    pub scores: ScoreTable,
}

/// Aggregate `records` and score the resulting feature table
pub fn run_pipeline(records: &[TransactionRecord]) -> Result<PipelineOutput, ScoringError> {
    let mut run = ScoringRun::new(records);
    run.aggregate()?;
    run.finish()
}

/// Staged scoring over one input batch.
///
/// Scoring reads only the feature table this run aggregated; calling
/// [`ScoringRun::score`] first is a [`ScoringError::Precedence`].
pub struct ScoringRun<'a> {
    records: &'a [TransactionRecord],
    features: Option<FeatureTable>,
    aggregator: FeatureAggregator,
    normalizer: ScoreNormalizer,
}

impl<'a> ScoringRun<'a> {
    pub fn new(records: &'a [TransactionRecord]) -> Self {
        Self {
            records,
            features: None,
            aggregator: FeatureAggregator::new(),
            normalizer: ScoreNormalizer::new(),
        }
    }

    pub fn aggregate(&mut self) -> Result<&FeatureTable, ScoringError> {
        let table = self.aggregator.aggregate(self.records)?;
        let table = self.features.insert(table);
        Ok(&*table)
    }

    pub fn features(&self) -> Option<&FeatureTable> {
        self.features.as_ref()
    }

    pub fn score(&self) -> Result<ScoreTable, ScoringError> {
        let features = self.features.as_ref().ok_or(ScoringError::Precedence)?;
        Ok(self.normalizer.score(features))
    }

    pub fn finish(self) -> Result<PipelineOutput, ScoringError> {
        let scores = self.score()?;
        let features = self.features.ok_or(ScoringError::Precedence)?;
        Ok(PipelineOutput { features, scores })
    }
}
