//! SQLite bootstrap for the query-backed city page source.
//!
//! # Responsibility
//! - Open connections with the city schema fully migrated.
//! - Report the schema version a connection carries, so repositories can
//!   refuse connections that were not opened through this module.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Callers never see a connection whose migrations failed.

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// The connection lacks the `cities` schema this build pages over.
    OutdatedSchema { db_version: u32, required: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::OutdatedSchema {
                db_version,
                required,
            } => write!(
                f,
                "city schema version {db_version} is older than required {required}; \
                 open the database with `open_db`"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::OutdatedSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Schema version recorded on `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Fails unless `conn` carries every migration this build knows.
///
/// # Errors
/// - `OutdatedSchema` for connections opened without `open_db*`.
pub fn ensure_current_schema(conn: &Connection) -> DbResult<()> {
    let db_version = schema_version(conn)?;
    let required = migrations::latest_version();
    if db_version < required {
        return Err(DbError::OutdatedSchema {
            db_version,
            required,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_current_schema, open_db_in_memory, schema_version, DbError};
    use crate::db::migrations::latest_version;
    use rusqlite::Connection;

    #[test]
    fn bare_connection_is_outdated() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);
        assert!(matches!(
            ensure_current_schema(&conn),
            Err(DbError::OutdatedSchema { db_version: 0, required }) if required == latest_version()
        ));
    }

    #[test]
    fn migrated_connection_is_current() {
        let conn = open_db_in_memory().unwrap();
        assert!(ensure_current_schema(&conn).is_ok());
    }
}
