//! Per-operation connection bootstrap.
//!
//! # Invariants
//! - Every call returns a brand-new connection owned by the caller.
//! - Returned connections have the address busy timeout applied.

use super::address::{ConnectionAddress, StorageTarget};
use super::DbResult;
use log::{debug, error};
use rusqlite::{Connection, OpenFlags};
use std::time::Instant;

/// Opens a fresh connection for `address`.
///
/// The connection closes when dropped, so callers scope it to a single
/// operation.
///
/// # Side effects
/// - Emits `db_open` logging events with mode, duration and status.
pub fn open_connection(address: &ConnectionAddress) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = address.mode();

    let opened = match address.target() {
        StorageTarget::File(path) => Connection::open(path),
        StorageTarget::SharedMemory(name) => Connection::open_with_flags(
            format!("file:{name}?mode=memory&cache=shared"),
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        ),
    };

    let conn = match opened.and_then(|conn| {
        conn.busy_timeout(address.busy_timeout())?;
        Ok(conn)
    }) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    debug!(
        "event=db_open module=db status=ok mode={} duration_ms={}",
        mode,
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::open_connection;
    use crate::db::ConnectionAddress;

    #[test]
    fn shared_memory_database_is_visible_across_connections() {
        let address = ConnectionAddress::parse("sqlite:mem:open_shared_visibility").unwrap();
        let keeper = open_connection(&address).unwrap();
        keeper
            .execute_batch("CREATE TABLE probe (value INTEGER); INSERT INTO probe VALUES (7);")
            .unwrap();

        let other = open_connection(&address).unwrap();
        let value: i64 = other
            .query_row("SELECT value FROM probe;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn opening_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let address = ConnectionAddress::file(dir.path().join("missing").join("contacts.db"));
        assert!(open_connection(&address).is_err());
    }
}
