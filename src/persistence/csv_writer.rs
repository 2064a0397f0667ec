//! CSV backend: one file for scores, one for the distribution

use super::writer_backend::{ScoreWriterBackend, ScoreWriterError};
use crate::report::ScoreDistribution;
use crate::scoring_core::ScoreTable;
use async_trait::async_trait;
use csv::Writer as CsvWriter;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const SCORES_FILE: &str = "wallet_credit_scores.csv";
pub const DISTRIBUTION_FILE: &str = "score_distribution.csv";

pub struct CsvScoreWriter {
    scores_path: PathBuf,
    distribution_path: PathBuf,
    pending: Vec<CsvWriter<File>>,
}

impl CsvScoreWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ScoreWriterError> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        log::info!("📝 Writing CSV results to: {}", output_dir.display());

        Ok(Self {
            scores_path: output_dir.join(SCORES_FILE),
            distribution_path: output_dir.join(DISTRIBUTION_FILE),
            pending: Vec::new(),
        })
    }

    pub fn scores_path(&self) -> &Path {
        &self.scores_path
    }

    pub fn distribution_path(&self) -> &Path {
        &self.distribution_path
    }
}

#[async_trait]
impl ScoreWriterBackend for CsvScoreWriter {
    async fn write_scores(&mut self, scores: &ScoreTable) -> Result<(), ScoreWriterError> {
        let mut wtr = CsvWriter::from_path(&self.scores_path)?;
        // Header comes from the first serialized row; write it explicitly so
        // an empty table still produces a valid file.
        if scores.is_empty() {
            wtr.write_record(["wallet", "credit_score"])?;
        }
        for score in scores.iter() {
            wtr.serialize(score)?;
        }
        self.pending.push(wtr);

        log::debug!("Wrote {} scores to {}", scores.len(), self.scores_path.display());
        Ok(())
    }

    async fn write_distribution(
        &mut self,
        distribution: &ScoreDistribution,
    ) -> Result<(), ScoreWriterError> {
        let mut wtr = CsvWriter::from_path(&self.distribution_path)?;
        for bucket in distribution.buckets() {
            wtr.serialize(bucket)?;
        }
        self.pending.push(wtr);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ScoreWriterError> {
        for mut wtr in self.pending.drain(..) {
            wtr.flush()?;
        }
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "CSV"
    }
}
