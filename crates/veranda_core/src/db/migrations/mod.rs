//! Forward-only schema migrations, tracked through `PRAGMA user_version`.
//!
//! Each migration is a plain SQL batch checked in next to this module.
//! `apply_migrations` runs every batch newer than the database's current
//! version inside its own transaction, then stamps the new version.

use rusqlite::Connection;

use super::{DbError, DbResult};

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "expiry_column",
        sql: include_str!("0002_expiry_column.sql"),
    },
];

/// Highest schema version this build knows how to produce.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Current `user_version` of the connected database.
pub fn schema_version(conn: &Connection) -> DbResult<i64> {
    let version = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

/// Brings the database up to the latest schema version and returns it.
///
/// A database stamped with a version newer than this build supports is
/// rejected with [`DbError::UnsupportedSchemaVersion`].
pub fn apply_migrations(conn: &Connection) -> DbResult<i64> {
    let mut current = schema_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            found: current,
            supported: latest,
        });
    }
    for migration in MIGRATIONS.iter().filter(move |m| m.version > current) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        tx.commit()?;
        log::info!(
            "event=db_migrate module=db from={current} to={} name={}",
            migration.version,
            migration.name
        );
        current = migration.version;
    }
    Ok(current)
}
