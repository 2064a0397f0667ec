//! Structural failures of the scoring core
//!
//! Numeric edge cases (zero denominators, constant columns) are resolved
//! in-algorithm and never surface here.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// No transaction records to aggregate
    EmptyInput,
    /// Scoring was requested before aggregation produced a feature table
    Precedence,
    /// Precomputed feature rows named the same wallet twice
    DuplicateWallet(String),
}

impl std::fmt::Display for ScoringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringError::EmptyInput => {
                write!(f, "No transaction data available for feature extraction")
            }
            ScoringError::Precedence => {
                write!(f, "Feature table not available: aggregate transactions before scoring")
            }
            ScoringError::DuplicateWallet(wallet) => {
                write!(f, "Duplicate feature row for wallet: {}", wallet)
            }
        }
    }
}

impl std::error::Error for ScoringError {}
