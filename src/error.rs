//! Error type shared by readers, queries and engines

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by [`Reader`](crate::Reader) and [`Query`](crate::Query)
///
/// Every failure reported by an engine is passed on as one of these kinds;
/// nothing is retried or swallowed.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Could not open corpus {}: {reason}", .path.display())]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Reader for {} is closed", .path.display())]
    ClosedReader { path: PathBuf },

    #[error("Could not retrieve entries")]
    EntryIterationFailed,

    #[error("Could not execute query: {query}")]
    QueryExecutionFailed { query: String },

    #[error("Could not read entry: {name}")]
    EntryNotFound { name: String },
}

impl CorpusError {
    pub(crate) fn open_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CorpusError::OpenFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CorpusError>;
