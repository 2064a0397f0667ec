//! Scoring Core - Wallet Feature Aggregation and Credit Scoring
//!
//! Converts canonical lending-protocol transactions into one credit score per
//! wallet in `[0, 1000]`.
//!
//! # Architecture
//!
//! ```text
//! Vec<TransactionRecord>
//!     ↓
//! FeatureAggregator (group by wallet → 15-column WalletFeatures)
//!     ↓
//! FeatureTable
//!     ↓
//! ScoreNormalizer (column min-max → equal-weight sum → rescale to 0-1000)
//!     ↓
//! ScoreTable
//! ```
//!
//! Both stages are pure: every call takes its input table and returns a new
//! one. Re-scoring a different wallet set never sees earlier min/max values.

pub mod error;
pub mod features;
pub mod normalizer;
pub mod pipeline;
pub mod scorer;

pub use error::ScoringError;
pub use features::{FeatureAggregator, FeatureTable, WalletAccumulator, WalletFeatures};
pub use normalizer::{ColumnRange, MinMaxScaler};
pub use pipeline::{run_pipeline, PipelineOutput, ScoringRun};
pub use scorer::{ScoreNormalizer, ScoreTable, WalletScore, MAX_CREDIT_SCORE};
