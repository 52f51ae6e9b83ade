//! Error types for the catalog crate.
//!
//! Malformed rows in the *raw* MovieLens tables are not errors: the
//! normalizer drops them and counts them. The variants below cover the
//! failures that do abort an operation: unreadable files and a corrupt
//! persisted catalog.

use thiserror::Error;

/// Errors that can occur while reading, normalizing or persisting the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV layer rejected the file (bad header, broken quoting, ...)
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// A row of the persisted catalog couldn't be parsed
    ///
    /// Carries the file and 1-based line so the operator can fix the file
    /// or re-run preprocessing.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The emotions column could not be encoded as a list
    #[error("Failed to encode emotions list: {0}")]
    EmotionsEncoding(#[from] serde_json::Error),

    /// The temporary file could not be moved over the destination
    #[error("Failed to replace {path}: {reason}")]
    PersistError { path: String, reason: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
