use addressbook_core::db::schema::{table_exists, CONTACTS_TABLE};
use addressbook_core::db::{open_connection, ConnectionAddress};
use addressbook_core::{ContactRepository, SqliteContactRepository};
use rusqlite::Connection;

#[test]
fn ensure_schema_creates_contacts_table_with_expected_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");
    let repo = SqliteContactRepository::new(ConnectionAddress::file(&path));

    repo.ensure_schema().unwrap();

    let conn = Connection::open(&path).unwrap();
    assert!(table_exists(&conn, CONTACTS_TABLE).unwrap());
    assert_eq!(
        column_names(&conn),
        vec!["id", "first_name", "last_name", "phone_number", "email"]
    );
}

#[test]
fn ensure_schema_twice_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");
    let repo = SqliteContactRepository::new(ConnectionAddress::file(&path));

    repo.ensure_schema().unwrap();
    Connection::open(&path)
        .unwrap()
        .execute(
            "INSERT INTO contacts (email, first_name, last_name) VALUES ('a@b.c', 'A', 'B');",
            [],
        )
        .unwrap();
    repo.ensure_schema().unwrap();

    assert_eq!(repo.get_all_contacts().unwrap().len(), 1);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");
    let repo = SqliteContactRepository::new(ConnectionAddress::file(&path));
    repo.ensure_schema().unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO contacts (email, first_name, last_name) VALUES ('a@b.c', 'A', 'B');",
        [],
    )
    .unwrap();
    conn.execute("DELETE FROM contacts;", []).unwrap();
    conn.execute(
        "INSERT INTO contacts (email, first_name, last_name) VALUES ('d@e.f', 'D', 'E');",
        [],
    )
    .unwrap();

    let all = repo.get_all_contacts().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, Some(2));
}

#[test]
fn each_open_returns_independent_connection() {
    let dir = tempfile::tempdir().unwrap();
    let address = ConnectionAddress::file(dir.path().join("contacts.db"));

    let first = open_connection(&address).unwrap();
    first
        .execute_batch("CREATE TABLE probe (value INTEGER);")
        .unwrap();
    drop(first);

    let second = open_connection(&address).unwrap();
    assert!(table_exists(&second, "probe").unwrap());
    assert!(!table_exists(&second, CONTACTS_TABLE).unwrap());
}

fn column_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(contacts);").unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}
