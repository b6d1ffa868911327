//! Error types for the ingestion pipeline

use thiserror::Error;

/// Pipeline error
///
/// Validation and empty-batch errors never reach storage. Transport errors
/// carry whatever the store reported; nothing is retried.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Input failed validation before any storage call
    #[error("{0}")]
    Validation(String),

    /// Nothing left to submit after filtering
    #[error("{0}")]
    EmptyBatch(String),

    /// Store or network call failed
    #[error("Transport error: {0}")]
    Transport(#[from] userbatch_common::Error),

    /// Spreadsheet could not be opened or read
    #[error("Spreadsheet error: {0}")]
    Parse(String),

    /// A delete is already awaiting confirmation or in flight
    #[error("A delete is already {0}")]
    DeleteInProgress(&'static str),
}

impl From<calamine::Error> for IngestError {
    fn from(err: calamine::Error) -> Self {
        IngestError::Parse(err.to_string())
    }
}

/// Result type for pipeline operations
pub type IngestResult<T> = Result<T, IngestError>;
