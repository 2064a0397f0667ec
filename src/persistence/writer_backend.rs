//! Writer backend trait for score output
//!
//! Defines the interface for persisting the score table and its distribution
//! to different storage backends.

use crate::report::ScoreDistribution;
use crate::scoring_core::ScoreTable;
use async_trait::async_trait;

#[derive(Debug)]
pub enum ScoreWriterError {
    Io(std::io::Error),
    Csv(csv::Error),
    Database(String),
}

impl From<std::io::Error> for ScoreWriterError {
    fn from(err: std::io::Error) -> Self {
        ScoreWriterError::Io(err)
    }
}

impl From<csv::Error> for ScoreWriterError {
    fn from(err: csv::Error) -> Self {
        ScoreWriterError::Csv(err)
    }
}

impl From<rusqlite::Error> for ScoreWriterError {
    fn from(err: rusqlite::Error) -> Self {
        ScoreWriterError::Database(err.to_string())
    }
}

impl std::fmt::Display for ScoreWriterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreWriterError::Io(e) => write!(f, "IO error: {}", e),
            ScoreWriterError::Csv(e) => write!(f, "CSV error: {}", e),
            ScoreWriterError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ScoreWriterError {}

/// Backend trait for writing scoring results
#[async_trait]
pub trait ScoreWriterBackend: Send {
    /// Write the full wallet → credit_score table, replacing earlier output
    async fn write_scores(&mut self, scores: &ScoreTable) -> Result<(), ScoreWriterError>;

    /// Write bucket counts, replacing earlier output
    async fn write_distribution(
        &mut self,
        distribution: &ScoreDistribution,
    ) -> Result<(), ScoreWriterError>;

    /// Flush pending writes to storage
    async fn flush(&mut self) -> Result<(), ScoreWriterError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}
