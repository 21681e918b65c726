//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The SQLite engine rejected a statement or could not open the file.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// `COMMIT` or `ROLLBACK` was requested with no open transaction.
    #[error("no active transaction")]
    NoActiveTransaction,

    /// `BEGIN` was requested while a transaction is already open.
    #[error("a transaction is already active")]
    TransactionAlreadyActive,
}
