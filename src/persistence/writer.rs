//! Unified writer interface for scoring results
//!
//! Routes writes to either the CSV or SQLite backend based on configuration.

use super::csv_writer::CsvScoreWriter;
use super::sqlite_writer::SqliteScoreWriter;
use super::writer_backend::{ScoreWriterBackend, ScoreWriterError};
use crate::report::ScoreDistribution;
use crate::scoring_core::ScoreTable;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Csv,
    Sqlite,
}

impl BackendType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(BackendType::Csv),
            "sqlite" => Some(BackendType::Sqlite),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Csv => "csv",
            BackendType::Sqlite => "sqlite",
        }
    }
}

/// Unified writer that routes to either CSV or SQLite backend
pub enum ScoreWriter {
    Csv(CsvScoreWriter),
    Sqlite(SqliteScoreWriter),
}

impl ScoreWriter {
    /// `target` is the output directory for CSV, or the database file for SQLite
    pub fn new(backend: BackendType, target: impl AsRef<Path>) -> Result<Self, ScoreWriterError> {
        match backend {
            BackendType::Csv => Ok(ScoreWriter::Csv(CsvScoreWriter::new(target)?)),
            BackendType::Sqlite => Ok(ScoreWriter::Sqlite(SqliteScoreWriter::new(target)?)),
        }
    }

    fn backend(&mut self) -> &mut dyn ScoreWriterBackend {
        match self {
            ScoreWriter::Csv(w) => w,
            ScoreWriter::Sqlite(w) => w,
        }
    }

    /// Persist both tables and flush
    pub async fn write_all(
        &mut self,
        scores: &ScoreTable,
        distribution: &ScoreDistribution,
    ) -> Result<(), ScoreWriterError> {
        let backend = self.backend();
        backend.write_scores(scores).await?;
        backend.write_distribution(distribution).await?;
        backend.flush().await
    }

    /// Get backend type for logging
    pub fn backend_type(&self) -> &'static str {
        match self {
            ScoreWriter::Csv(w) => w.backend_type(),
            ScoreWriter::Sqlite(w) => w.backend_type(),
        }
    }
}
