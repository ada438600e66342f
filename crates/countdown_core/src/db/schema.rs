//! `kv_entries` layout check and creation.

use super::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;

/// Layout version written to `PRAGMA user_version`.
pub const KV_SCHEMA_VERSION: u32 = 1;

const KV_ENTRIES_SQL: &str = include_str!("kv_entries.sql");

/// Creates the entries table on a blank database, or checks an existing one.
///
/// # Errors
/// - `DbError::SchemaTooNew` when the file comes from a newer build.
/// - `DbError::MissingKvTable` when the version marker is set but the table
///   was dropped.
pub fn ensure_kv_schema(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;

    if found > KV_SCHEMA_VERSION {
        warn!(
            "event=kv_schema module=db status=error error_code=schema_too_new found={found} supported={KV_SCHEMA_VERSION}"
        );
        return Err(DbError::SchemaTooNew {
            found,
            supported: KV_SCHEMA_VERSION,
        });
    }

    if found == 0 {
        let tx = conn.transaction()?;
        tx.execute_batch(KV_ENTRIES_SQL)?;
        tx.pragma_update(None, "user_version", KV_SCHEMA_VERSION)?;
        tx.commit()?;
        info!("event=kv_schema module=db status=created version={KV_SCHEMA_VERSION}");
        return Ok(());
    }

    let has_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries');",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        warn!("event=kv_schema module=db status=error error_code=kv_table_missing version={found}");
        return Err(DbError::MissingKvTable { version: found });
    }
    Ok(())
}
