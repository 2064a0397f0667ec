//! SQLite backend for scoring results
//!
//! Each run is a full recompute, so writes replace the previous snapshot
//! inside a single transaction.

use super::writer_backend::{ScoreWriterBackend, ScoreWriterError};
use crate::report::ScoreDistribution;
use crate::scoring_core::ScoreTable;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;

pub struct SqliteScoreWriter {
    conn: Connection,
    scored_at: i64,
}

impl SqliteScoreWriter {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, ScoreWriterError> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ScoreWriterError::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to create database directory {}: {}", parent.display(), e),
                    ))
                })?;
            }
        }

        let conn = Connection::open(db_path)?;

        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        log::debug!("SQLite journal mode: {}", journal_mode);

        conn.execute(
            "CREATE TABLE IF NOT EXISTS wallet_scores (
                wallet TEXT PRIMARY KEY NOT NULL,
                credit_score REAL NOT NULL,
                scored_at INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_credit_score ON wallet_scores(credit_score DESC)",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS score_distribution (
                score_range TEXT PRIMARY KEY NOT NULL,
                wallet_count INTEGER NOT NULL,
                scored_at INTEGER NOT NULL
            )",
            [],
        )?;

        log::info!("✅ SQLite score database initialized");

        Ok(Self {
            conn,
            scored_at: chrono::Utc::now().timestamp(),
        })
    }

    fn replace_scores(&mut self, scores: &ScoreTable) -> Result<(), ScoreWriterError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM wallet_scores", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO wallet_scores (wallet, credit_score, scored_at) VALUES (?1, ?2, ?3)",
            )?;
            for score in scores.iter() {
                stmt.execute(params![score.wallet, score.credit_score, self.scored_at])?;
            }
        }
        tx.commit()?;

        log::debug!("✅ Wrote {} wallet scores to SQLite", scores.len());
        Ok(())
    }

    fn replace_distribution(
        &mut self,
        distribution: &ScoreDistribution,
    ) -> Result<(), ScoreWriterError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM score_distribution", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO score_distribution (score_range, wallet_count, scored_at)
                 VALUES (?1, ?2, ?3)",
            )?;
            for bucket in distribution.buckets() {
                stmt.execute(params![bucket.score_range, bucket.count as i64, self.scored_at])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[async_trait]
impl ScoreWriterBackend for SqliteScoreWriter {
    async fn write_scores(&mut self, scores: &ScoreTable) -> Result<(), ScoreWriterError> {
        self.replace_scores(scores)
    }

    async fn write_distribution(
        &mut self,
        distribution: &ScoreDistribution,
    ) -> Result<(), ScoreWriterError> {
        self.replace_distribution(distribution)
    }

    async fn flush(&mut self) -> Result<(), ScoreWriterError> {
        // Every write commits its own transaction
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}
