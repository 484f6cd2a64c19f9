//! Error types for the factus-core library.
//!
//! The inference algorithms themselves never fail: they report a missing
//! result as `None` or an empty list. These types cover the storage and
//! configuration layers around them.

use thiserror::Error;

/// Main error type for the factus library.
#[derive(Error, Debug)]
pub enum FactusError {
    /// Persistence error (history table, AI cache, merged export).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised at the CSV storage boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read or write a CSV table.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to create or open the backing file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the factus library.
pub type Result<T> = std::result::Result<T, FactusError>;

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
