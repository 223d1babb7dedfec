//! Error types for scanning, storage and querying.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while indexing or searching.
///
/// Per-document variants (`Discovery`, `Fingerprint`, `Extraction`,
/// `StoreTransaction`) are recovered by the scan pipeline: the document is
/// logged, counted and skipped. `SchemaInit` and `DatabaseNotFound` are
/// fatal for the process.
#[derive(Debug, Error)]
pub enum Error {
    /// A directory entry could not be visited during discovery
    #[error("cannot access {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    /// The source file could not be read for hashing
    #[error("failed to fingerprint {path}: {source}")]
    Fingerprint {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Text extraction failed for the whole document
    #[error("failed to extract text from {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    /// Replacing a document's pages was rolled back
    #[error("failed to store pages for {path}: {source}")]
    StoreTransaction {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The store schema could not be created; the store is unusable
    #[error("initializing database schema ({step}): {source}")]
    SchemaInit {
        step: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// The full-text match expression was rejected
    #[error("search query '{query}' failed: {source}")]
    Query {
        query: String,
        #[source]
        source: rusqlite::Error,
    },

    /// No store file in the start directory or any ancestor
    #[error("no database named {file_name} found from {start} upwards - run 'scan' first")]
    DatabaseNotFound { start: PathBuf, file_name: String },

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that only affect a single document of a scan.
    pub fn is_per_document(&self) -> bool {
        matches!(
            self,
            Error::Discovery { .. }
                | Error::Fingerprint { .. }
                | Error::Extraction { .. }
                | Error::StoreTransaction { .. }
        )
    }
}
