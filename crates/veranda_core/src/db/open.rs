use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use super::migrations::{apply_migrations, latest_version};
use super::DbResult;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the cache database at `path` and migrates it to
/// the latest schema version.
pub fn open_db(path: &Path) -> DbResult<Connection> {
    let conn = Connection::open(path)?;
    prepare(conn, &path.display().to_string())
}

/// Opens a fresh in-memory database, migrated to the latest schema.
///
/// Each call returns an independent database; nothing is shared between
/// connections.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let conn = Connection::open_in_memory()?;
    prepare(conn, ":memory:")
}

fn prepare(conn: Connection, location: &str) -> DbResult<Connection> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    let version = apply_migrations(&conn)?;
    log::info!(
        "event=db_open module=db location={location} schema_version={version} latest={}",
        latest_version()
    );
    Ok(conn)
}
