//! SQLite bootstrap for the cache database.
//!
//! # Responsibility
//! - Own the connection-opening routines and the migration runner.
//! - Define the database error type shared by the storage layer.
//!
//! # Invariants
//! - Every connection handed out has already been migrated to the
//!   latest schema version.
//! - Schema versions only move forward; a database written by a newer
//!   build is rejected rather than silently downgraded.
//!
//! # See also
//! - `crate::storage::KvStore` for the table this schema backs.

pub mod migrations;
mod open;

use std::fmt;

pub use open::{open_db, open_db_in_memory};

/// Errors surfaced while opening or migrating the cache database.
#[derive(Debug)]
pub enum DbError {
    /// Underlying SQLite failure.
    Sqlite(rusqlite::Error),
    /// The on-disk schema is newer than this build understands.
    UnsupportedSchemaVersion { found: i64, supported: i64 },
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::Sqlite(e) => write!(f, "sqlite error: {e}"),
            DbError::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "unsupported schema version {found} (this build supports up to {supported})"
            ),
        }
    }
}

impl std::error::Error for DbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DbError::Sqlite(e) => Some(e),
            DbError::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        DbError::Sqlite(e)
    }
}

/// Result alias for database operations.
pub type DbResult<T> = Result<T, DbError>;
