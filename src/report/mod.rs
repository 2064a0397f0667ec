//! Score reporting: range buckets, histogram, summary statistics

pub mod distribution;
pub mod summary;

pub use distribution::{ScoreBucket, ScoreDistribution, BUCKET_COUNT, BUCKET_WIDTH};
pub use summary::ScoreSummary;
