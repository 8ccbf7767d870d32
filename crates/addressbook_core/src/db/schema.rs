//! `contacts` table definition.
//!
//! SQLite does not enforce `VARCHAR(n)` lengths; `Contact::validate()`
//! carries those limits on the write path.

use super::DbResult;
use rusqlite::Connection;

pub const CONTACTS_TABLE: &str = "contacts";

const CREATE_CONTACTS_SQL: &str = "CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name VARCHAR(50) NOT NULL,
    last_name VARCHAR(50) NOT NULL,
    phone_number VARCHAR(20),
    email VARCHAR(100)
);";

/// Creates the `contacts` table when it does not exist yet.
pub fn create_contacts_table(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_CONTACTS_SQL)?;
    Ok(())
}

/// Returns whether `table_name` exists in the connected database.
pub fn table_exists(conn: &Connection, table_name: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
