//! Connection address parsing.
//!
//! Accepted forms:
//! - `sqlite:<path>` or a bare `<path>`: database file.
//! - `sqlite:mem:<name>`: named shared-cache in-memory database.
//!
//! Optional `?key=value&key=value` parameters:
//! - `insert=conditional|transaction`
//! - `busy_timeout_ms=<u64>`

use super::{DbError, DbResult};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const SQLITE_SCHEME: &str = "sqlite:";
const MEMORY_PREFIX: &str = "mem:";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    /// On-disk database file.
    File(PathBuf),
    /// Named in-memory database shared by every connection of this process.
    ///
    /// The database is discarded once its last open connection closes.
    SharedMemory(String),
}

/// How `add` performs its insert-if-absent check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertStrategy {
    /// One `INSERT ... SELECT ... WHERE NOT EXISTS` statement; the affected
    /// row count acts as the applied flag.
    #[default]
    Conditional,
    /// `BEGIN IMMEDIATE`, lookup by email, then a plain insert and commit.
    Transaction,
}

impl InsertStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conditional => "conditional",
            Self::Transaction => "transaction",
        }
    }
}

/// Parsed connection address used to open per-operation connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionAddress {
    raw: String,
    target: StorageTarget,
    insert_strategy: InsertStrategy,
    busy_timeout: Duration,
}

impl ConnectionAddress {
    /// Parses `raw` into a validated address.
    ///
    /// # Errors
    /// - `DbError::InvalidAddress` for an empty location, a malformed
    ///   memory name, an unknown parameter or an unparsable value.
    pub fn parse(raw: &str) -> DbResult<Self> {
        let trimmed = raw.trim();
        let (location, query) = match trimmed.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (trimmed, None),
        };

        let location = location.strip_prefix(SQLITE_SCHEME).unwrap_or(location);
        let target = parse_target(raw, location)?;

        let mut address = Self {
            raw: trimmed.to_string(),
            target,
            insert_strategy: InsertStrategy::default(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        };

        for pair in query.unwrap_or("").split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| invalid(raw, format!("parameter `{pair}` is not key=value")))?;
            match key {
                "insert" => {
                    address.insert_strategy = match value {
                        "conditional" => InsertStrategy::Conditional,
                        "transaction" => InsertStrategy::Transaction,
                        other => {
                            return Err(invalid(
                                raw,
                                format!(
                                    "unsupported insert strategy `{other}`; expected conditional|transaction"
                                ),
                            ))
                        }
                    }
                }
                "busy_timeout_ms" => {
                    let millis = value.parse::<u64>().map_err(|_| {
                        invalid(raw, format!("busy_timeout_ms `{value}` is not a number"))
                    })?;
                    address.busy_timeout = Duration::from_millis(millis);
                }
                other => return Err(invalid(raw, format!("unknown parameter `{other}`"))),
            }
        }

        Ok(address)
    }

    /// Address for a database file with default parameters.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            raw: format!("{SQLITE_SCHEME}{}", path.display()),
            target: StorageTarget::File(path),
            insert_strategy: InsertStrategy::default(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    /// Returns a copy using `strategy` for conditional inserts.
    pub fn with_insert_strategy(mut self, strategy: InsertStrategy) -> Self {
        self.insert_strategy = strategy;
        self
    }

    pub fn target(&self) -> &StorageTarget {
        &self.target
    }

    pub fn insert_strategy(&self) -> InsertStrategy {
        self.insert_strategy
    }

    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }

    /// Short label for log lines; never includes the path.
    pub(crate) fn mode(&self) -> &'static str {
        match self.target {
            StorageTarget::File(_) => "file",
            StorageTarget::SharedMemory(_) => "memory",
        }
    }
}

impl FromStr for ConnectionAddress {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for ConnectionAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_target(raw: &str, location: &str) -> DbResult<StorageTarget> {
    if let Some(name) = location.strip_prefix(MEMORY_PREFIX) {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
        if !valid {
            return Err(invalid(
                raw,
                "memory database name must be non-empty [A-Za-z0-9_-]".to_string(),
            ));
        }
        return Ok(StorageTarget::SharedMemory(name.to_string()));
    }

    if location.trim().is_empty() {
        return Err(invalid(raw, "database path cannot be empty".to_string()));
    }
    Ok(StorageTarget::File(PathBuf::from(location)))
}

fn invalid(raw: &str, reason: String) -> DbError {
    DbError::InvalidAddress {
        address: raw.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectionAddress, InsertStrategy, StorageTarget};
    use crate::db::DbError;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn bare_path_and_scheme_path_resolve_to_same_file() {
        let bare = ConnectionAddress::parse("/tmp/contacts.db").unwrap();
        let scheme = ConnectionAddress::parse("sqlite:/tmp/contacts.db").unwrap();

        assert_eq!(bare.target(), scheme.target());
        assert_eq!(
            bare.target(),
            &StorageTarget::File(PathBuf::from("/tmp/contacts.db"))
        );
        assert_eq!(bare.insert_strategy(), InsertStrategy::Conditional);
        assert_eq!(bare.busy_timeout(), Duration::from_millis(5_000));
    }

    #[test]
    fn parses_memory_target_and_parameters() {
        let address =
            ConnectionAddress::parse("sqlite:mem:address-book?insert=transaction&busy_timeout_ms=250")
                .unwrap();

        assert_eq!(
            address.target(),
            &StorageTarget::SharedMemory("address-book".to_string())
        );
        assert_eq!(address.insert_strategy(), InsertStrategy::Transaction);
        assert_eq!(address.busy_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn rejects_unknown_parameter_and_bad_values() {
        for raw in [
            "sqlite:/tmp/a.db?handler=insert-if-not-exists",
            "sqlite:/tmp/a.db?insert=upsert",
            "sqlite:/tmp/a.db?busy_timeout_ms=soon",
            "sqlite:/tmp/a.db?insert",
            "sqlite:",
            "sqlite:mem:",
            "sqlite:mem:bad name",
        ] {
            let err = ConnectionAddress::parse(raw).unwrap_err();
            assert!(
                matches!(err, DbError::InvalidAddress { .. }),
                "expected invalid address for {raw}"
            );
        }
    }

    #[test]
    fn display_keeps_raw_address() {
        let address: ConnectionAddress = "sqlite:mem:book?insert=conditional".parse().unwrap();
        assert_eq!(address.to_string(), "sqlite:mem:book?insert=conditional");
    }
}
