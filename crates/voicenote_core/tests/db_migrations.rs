use rusqlite::Connection;
use voicenote_core::db::migrations::{current_user_version, latest_version};
use voicenote_core::db::{open_db, open_db_in_memory, DbError};
use voicenote_core::{NoteError, NoteRepository, SqliteNoteStore};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_eq!(count_schema_objects(&conn, "table", "notes"), 1);
    assert_eq!(
        count_schema_objects(&conn, "index", "idx_notes_updated_at"),
        1
    );
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("voicenote.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn_first).unwrap(), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn_second).unwrap(), latest_version());
    assert_eq!(count_schema_objects(&conn_second, "table", "notes"), 1);
}

#[test]
fn initialize_twice_creates_no_duplicate_schema_objects() {
    let mut store = SqliteNoteStore::open_in_memory().unwrap();
    store.initialize().unwrap();
    store.initialize().unwrap();

    let conn = store.connection();
    assert_eq!(count_schema_objects(conn, "table", "notes"), 1);
    assert_eq!(count_schema_objects(conn, "index", "idx_notes_updated_at"), 1);
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn reopening_store_keeps_existing_notes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("voicenote.db");

    {
        let store = SqliteNoteStore::open(&path).unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO notes (title, content, created_at, updated_at, device_id)
                 VALUES ('t', 'kept', 1, 1, 'local-device');",
                [],
            )
            .unwrap();
    }

    let store = SqliteNoteStore::open(&path).unwrap();
    let notes = store.list_all().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "kept");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(matches!(
        SqliteNoteStore::open(&path),
        Err(NoteError::StorageUnavailable(_))
    ));
}

#[test]
fn unopenable_path_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested").join("notes.db");

    let err = SqliteNoteStore::open(&path).err().expect("open must fail");
    assert!(matches!(err, NoteError::StorageUnavailable(_)));
    assert_eq!(err.code(), "storage_unavailable");
}

fn count_schema_objects(conn: &Connection, kind: &str, name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2;",
        [kind, name],
        |row| row.get(0),
    )
    .unwrap()
}
