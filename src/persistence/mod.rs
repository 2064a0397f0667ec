//! Durable storage for score and distribution tables
//!
//! Tables are written verbatim; no transformation happens here.

pub mod csv_writer;
pub mod sqlite_writer;
pub mod writer;
pub mod writer_backend;

pub use csv_writer::CsvScoreWriter;
pub use sqlite_writer::SqliteScoreWriter;
pub use writer::{BackendType, ScoreWriter};
pub use writer_backend::{ScoreWriterBackend, ScoreWriterError};
