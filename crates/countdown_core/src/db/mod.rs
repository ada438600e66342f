//! SQLite backing for the countdown key-value store.
//!
//! # Responsibility
//! - Open connections and make sure the `kv_entries` table is usable.
//! - Refuse databases written by a newer layout instead of guessing.
//!
//! # Invariants
//! - The layout version lives in `PRAGMA user_version`.
//! - A connection returned by `open_db*` has a readable `kv_entries` table.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{ensure_kv_schema, KV_SCHEMA_VERSION};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File was written by a build with a newer store layout.
    SchemaTooNew { found: u32, supported: u32 },
    /// Version marker is set but the entries table is gone.
    MissingKvTable { version: u32 },
}

impl DbError {
    /// Whether the file exists but this build cannot use it as a store.
    pub fn is_incompatible_store(&self) -> bool {
        matches!(
            self,
            Self::SchemaTooNew { .. } | Self::MissingKvTable { .. }
        )
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "key-value store layout v{found} is newer than supported v{supported}"
            ),
            Self::MissingKvTable { version } => write!(
                f,
                "key-value store marked v{version} but table `kv_entries` is missing"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::MissingKvTable { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
