//! Wallet credit scoring for lending-protocol ledgers
//!
//! ```text
//! ingest (ledger file → TransactionRecord)
//!     ↓
//! scoring_core (FeatureTable → ScoreTable)
//!     ↓
//! report (buckets, histogram, summary)
//!     ↓
//! persistence (CSV or SQLite)
//! ```


pub mod config;
pub mod ingest;
pub mod persistence;
pub mod report;
pub mod scoring_core;

pub use ingest::{Action, TransactionRecord};
pub use scoring_core::{run_pipeline, FeatureTable, ScoreTable, ScoringError, WalletFeatures};
