//! SQLite storage bootstrap and schema entry points.
//!
//! # Responsibility
//! - Parse connection addresses into a typed, validated form.
//! - Open one SQLite connection per repository operation.
//! - Own the `contacts` table DDL.
//!
//! # Invariants
//! - Connections are never cached or shared across operations.
//! - A connection is released when its value is dropped, on every exit path.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod address;
mod open;
pub mod schema;

pub use address::{ConnectionAddress, InsertStrategy, StorageTarget};
pub use open::open_connection;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    InvalidAddress { address: String, reason: String },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidAddress { address, reason } => {
                write!(f, "invalid connection address `{address}`: {reason}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidAddress { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
