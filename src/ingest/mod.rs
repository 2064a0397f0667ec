//! Ledger ingestion
//!
//! Turns raw lending-protocol ledger entries into canonical
//! [`TransactionRecord`]s for the scoring core. Malformed entries are dropped
//! here so the core never sees them.

pub mod error;
pub mod loader;
pub mod record;

pub use error::IngestError;
pub use loader::{LoadStats, LoadedTransactions, TransactionLoader};
pub use record::{
    parse_amount, parse_timestamp, Action, ActionDetails, RawTransaction, TransactionRecord,
};
