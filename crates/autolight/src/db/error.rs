//! Database error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error from rusqlite.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error when creating directories or files.
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A migration failed to apply.
    #[error("Migration failed at version {version}: {reason}")]
    Migration { version: u32, reason: String },

    /// The database lock was poisoned.
    #[error("Database lock poisoned")]
    LockPoisoned,

    /// A write or lookup matched no row visible to the caller.
    #[error("No {table} row with id '{id}' for this owner")]
    NotFound { table: &'static str, id: String },

    /// A column value was rejected on write or could not be decoded on read.
    #[error("Invalid value in {table}.{column}: {reason}")]
    InvalidValue {
        table: &'static str,
        column: &'static str,
        reason: String,
    },
}
