//! Notes database: connection bootstrap and schema versioning.
//!
//! # Responsibility
//! - Hand out SQLite connections that are ready for note reads and writes.
//! - Bring older note files up to the current schema.
//!
//! # Invariants
//! - The schema version of a notes file lives in `PRAGMA user_version`.
//! - A connection is only returned once every migration has applied.
//! - A notes file written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or upgrading the notes database.
#[derive(Debug)]
pub enum DbError {
    /// Connection setup or a plain statement failed.
    Sqlite(rusqlite::Error),
    /// A schema migration failed; the file keeps its previous version.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The notes file was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "notes database error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "notes schema migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "notes file has schema version {found}; this build reads up to {supported}"
            ),
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
