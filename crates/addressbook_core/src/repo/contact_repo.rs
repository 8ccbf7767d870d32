//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate address book operations into parameterized SQL.
//! - Decode `contacts` rows into `Contact` values.
//!
//! # Invariants
//! - Each operation opens its own connection and drops it before returning.
//! - `add` never overwrites an existing row with the same email.
//! - Write paths call `Contact::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::schema::create_contacts_table;
use crate::db::{open_connection, ConnectionAddress, DbError, InsertStrategy};
use crate::model::contact::{Contact, ContactValidationError};
use log::{debug, info, warn};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const INSERT_CONTACT_SQL: &str =
    "INSERT INTO contacts (email, first_name, last_name, phone_number) VALUES (?1, ?2, ?3, ?4);";

const INSERT_CONTACT_IF_ABSENT_SQL: &str =
    "INSERT INTO contacts (email, first_name, last_name, phone_number)
     SELECT ?1, ?2, ?3, ?4
     WHERE NOT EXISTS (SELECT 1 FROM contacts WHERE email = ?1);";

const UPDATE_CONTACT_SQL: &str =
    "UPDATE contacts SET first_name = ?1, last_name = ?2, phone_number = ?3 WHERE email = ?4;";

const SELECT_ALL_CONTACTS_SQL: &str = "SELECT * FROM contacts;";

const SELECT_CONTACT_BY_EMAIL_SQL: &str = "SELECT * FROM contacts WHERE email = ?1;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Db(DbError),
    /// Conditional insert was not applied because the email is taken.
    AlreadyExists { email: String },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::AlreadyExists { .. } => write!(f, "row already exists"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::AlreadyExists { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for address book operations.
pub trait ContactRepository {
    /// Creates the `contacts` table if absent.
    fn ensure_schema(&self) -> RepoResult<()>;
    /// Inserts `contact` unless its email is already stored.
    ///
    /// Returns the contact unchanged; `id` is not backfilled.
    fn add(&self, contact: Contact) -> RepoResult<Contact>;
    /// Updates names and phone of the row matching `contact.email`.
    ///
    /// A missing row is a silent no-op.
    fn save(&self, contact: Contact) -> RepoResult<Contact>;
    /// Returns every stored contact in storage order.
    fn get_all_contacts(&self) -> RepoResult<Vec<Contact>>;
    /// Reads back one contact by its natural key.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Contact>>;
}

/// SQLite-backed contact repository.
///
/// Holds only the address; no connection outlives a single call.
#[derive(Debug, Clone)]
pub struct SqliteContactRepository {
    address: ConnectionAddress,
}

impl SqliteContactRepository {
    pub fn new(address: ConnectionAddress) -> Self {
        Self { address }
    }

    /// Parses `address` and builds a repository for it.
    pub fn from_address(address: &str) -> RepoResult<Self> {
        Ok(Self::new(ConnectionAddress::parse(address)?))
    }

    pub fn address(&self) -> &ConnectionAddress {
        &self.address
    }

    fn connect(&self) -> RepoResult<Connection> {
        Ok(open_connection(&self.address)?)
    }
}

impl ContactRepository for SqliteContactRepository {
    fn ensure_schema(&self) -> RepoResult<()> {
        let conn = self.connect()?;
        create_contacts_table(&conn)?;
        info!("event=schema_ensure module=repo status=ok table=contacts");
        Ok(())
    }

    fn add(&self, contact: Contact) -> RepoResult<Contact> {
        contact.validate()?;

        let started_at = Instant::now();
        let strategy = self.address.insert_strategy();
        let mut conn = self.connect()?;
        let applied = match strategy {
            InsertStrategy::Conditional => insert_if_absent(&conn, &contact)?,
            InsertStrategy::Transaction => insert_if_absent_in_tx(&mut conn, &contact)?,
        };

        if !applied {
            warn!(
                "event=contact_add module=repo status=rejected reason=already_exists strategy={} duration_ms={}",
                strategy.as_str(),
                started_at.elapsed().as_millis()
            );
            return Err(RepoError::AlreadyExists {
                email: contact.email,
            });
        }

        info!(
            "event=contact_add module=repo status=ok strategy={} duration_ms={}",
            strategy.as_str(),
            started_at.elapsed().as_millis()
        );
        Ok(contact)
    }

    fn save(&self, contact: Contact) -> RepoResult<Contact> {
        contact.validate()?;

        let conn = self.connect()?;
        let changed = conn.execute(
            UPDATE_CONTACT_SQL,
            params![
                contact.first_name.as_str(),
                contact.last_name.as_str(),
                contact.phone_number.as_deref(),
                contact.email.as_str(),
            ],
        )?;

        if changed == 0 {
            warn!("event=contact_save module=repo status=ok rows_affected=0 reason=no_match");
        } else {
            info!("event=contact_save module=repo status=ok rows_affected={changed}");
        }
        Ok(contact)
    }

    fn get_all_contacts(&self) -> RepoResult<Vec<Contact>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(SELECT_ALL_CONTACTS_SQL)?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        debug!(
            "event=contact_list module=repo status=ok count={}",
            contacts.len()
        );
        Ok(contacts)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Contact>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(SELECT_CONTACT_BY_EMAIL_SQL)?;
        let mut rows = stmt.query([email])?;

        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }
}

/// Single-statement insert; the affected row count is the applied flag.
fn insert_if_absent(conn: &Connection, contact: &Contact) -> RepoResult<bool> {
    let changed = conn.execute(INSERT_CONTACT_IF_ABSENT_SQL, contact_insert_params(contact))?;
    Ok(changed == 1)
}

/// Lookup then insert under a write lock taken at `BEGIN IMMEDIATE`.
fn insert_if_absent_in_tx(conn: &mut Connection, contact: &Contact) -> RepoResult<bool> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM contacts WHERE email = ?1);",
        [contact.email.as_str()],
        |row| row.get(0),
    )?;
    if exists == 1 {
        // Dropping `tx` rolls back.
        return Ok(false);
    }

    tx.execute(INSERT_CONTACT_SQL, contact_insert_params(contact))?;
    tx.commit()?;
    Ok(true)
}

fn contact_insert_params(contact: &Contact) -> [&dyn rusqlite::ToSql; 4] {
    [
        &contact.email,
        &contact.first_name,
        &contact.last_name,
        &contact.phone_number,
    ]
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let id: i64 = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in contacts.id"
        )));
    }

    let email = row
        .get::<_, Option<String>>("email")?
        .ok_or_else(|| RepoError::InvalidData(format!("missing email for contacts.id {id}")))?;

    Ok(Contact {
        id: Some(id),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        phone_number: row.get("phone_number")?,
        email,
    })
}
