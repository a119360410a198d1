//! SQLite storage for the `locations` table.
//!
//! Connections are opened through [`open_db`] or [`open_db_in_memory`],
//! which bring the schema up to [`migrations::latest_version`] before the
//! store sees them. The schema version lives in `PRAGMA user_version`; a
//! database stamped by a newer build is refused rather than downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The location database could not be opened, read or written.
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build of this crate.
    SchemaTooNew { found: u32, supported: u32 },
    /// A schema step failed; nothing from the pending batch was kept.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "location storage unavailable: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "location database is at schema {found}, this build supports up to {supported}"
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "location schema step {version} ({name}) failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
