//! Error types for the transfer batch.

use thiserror::Error;

/// Result type alias for batch operations
pub type Result<T> = std::result::Result<T, BatchError>;

/// Errors that can occur while loading, applying or reporting a batch.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A line of an input resource could not be parsed
    #[error("Invalid record at line {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// A transfer request references an account absent from the ledger
    #[error("Unknown account {account}")]
    UnknownAccount { account: i64 },

    /// A report file for this run timestamp already exists
    #[error("Report file {path} already exists")]
    ReportExists { path: String },

    /// Missing positional arguments
    #[error(
        "Missing arguments. Usage: transfer-batch [--strict] <balances.csv> <requests.csv> <output-dir>"
    )]
    MissingArgument,
}
