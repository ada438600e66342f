use countdown_core::db::{open_db, open_db_in_memory, DbError, KV_SCHEMA_VERSION};
use countdown_core::{
    CountdownConfig, KeyValueStore, ManualClock, SqliteKeyValueStore, StoreError,
    TargetResolver, TargetSource,
};
use rusqlite::Connection;

#[test]
fn blank_database_gets_kv_table_and_version() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), KV_SCHEMA_VERSION);
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries');",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn newer_layout_is_rejected_as_unavailable_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match &err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(*found, 999);
            assert_eq!(*supported, KV_SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(StoreError::from(err), StoreError::Unavailable(_)));
}

#[test]
fn dropped_kv_table_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("damaged.db");

    let conn = open_db(&path).unwrap();
    conn.execute_batch("DROP TABLE kv_entries;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::MissingKvTable { version } if version == KV_SCHEMA_VERSION));
    assert!(err.is_incompatible_store());
}

#[test]
fn unopenable_path_is_a_plain_sqlite_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = open_db(dir.path().join("missing-dir").join("x.db")).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

#[test]
fn sqlite_store_get_set_overwrite() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    assert_eq!(store.get("target").unwrap(), None);
    store.set("target", "100").unwrap();
    store.set("target", "200").unwrap();
    assert_eq!(store.get("target").unwrap().as_deref(), Some("200"));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn target_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("countdown.db");
    let config = CountdownConfig::default();
    let clock = ManualClock::new(1_700_000_000_000);

    let first = {
        let conn = open_db(&path).unwrap();
        let resolution =
            TargetResolver::new(SqliteKeyValueStore::new(&conn), &clock, &config).resolve();
        resolution
    };

    clock.advance(60_000);
    let conn = open_db(&path).unwrap();
    let second = TargetResolver::new(SqliteKeyValueStore::new(&conn), &clock, &config).resolve();

    assert_eq!(second.source, TargetSource::Persisted);
    assert_eq!(second.target, first.target);
    assert_eq!(schema_version(&conn), KV_SCHEMA_VERSION);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
