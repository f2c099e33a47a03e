//! Note store contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the single database connection for the process.
//! - Provide create/read/list/delete over the `notes` table.
//!
//! # Invariants
//! - `insert` and `delete_by_id` each run in one IMMEDIATE transaction.
//! - Lists are ordered `updated_at DESC, id ASC`.
//! - Deleting an unknown id is an error (`NoteError::NotFound`), not a no-op.

use crate::codec::{decode_extra, decode_keywords, encode_extra, encode_keywords, CodecError};
use crate::db::migrations::apply_migrations;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::error::{NoteError, NoteResult};
use crate::model::note::{NewNote, Note, NoteId, SyncMetadata};
use log::{error, info, warn};
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::path::Path;
use std::time::Instant;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    keywords,
    audio_uri,
    created_at,
    updated_at,
    is_sync,
    device_id,
    sync_metadata
FROM notes";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "title",
    "content",
    "keywords",
    "audio_uri",
    "created_at",
    "updated_at",
    "is_sync",
    "device_id",
    "sync_metadata",
];

/// Store interface consumed by `NoteService`.
pub trait NoteRepository {
    /// Assigns an id and writes the note atomically.
    fn insert(&mut self, note: NewNote) -> NoteResult<Note>;
    /// Loads one note by id.
    fn get(&self, id: NoteId) -> NoteResult<Option<Note>>;
    /// Returns every note, most recently updated first.
    fn list_all(&self) -> NoteResult<Vec<Note>>;
    /// Removes exactly one note.
    fn delete_by_id(&mut self, id: NoteId) -> NoteResult<()>;
    /// Number of stored notes.
    fn count(&self) -> NoteResult<u64>;
}

/// SQLite-backed note store.
///
/// Constructed once per process and passed to whoever needs it.
pub struct SqliteNoteStore {
    conn: Connection,
}

impl SqliteNoteStore {
    /// Opens or creates the database file and makes sure the schema exists.
    ///
    /// # Errors
    /// - `NoteError::StorageUnavailable` when the file cannot be opened or
    ///   migrated (permissions, disk full, newer schema).
    pub fn open(path: impl AsRef<Path>) -> NoteResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> NoteResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps an existing connection after checking the schema is usable.
    pub fn from_connection(conn: Connection) -> NoteResult<Self> {
        let mut store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Ensures the schema exists. Idempotent.
    pub fn initialize(&mut self) -> NoteResult<()> {
        apply_migrations(&mut self.conn)?;
        ensure_notes_table_ready(&self.conn)
    }

    /// Read access to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl NoteRepository for SqliteNoteStore {
    fn insert(&mut self, note: NewNote) -> NoteResult<Note> {
        note.validate()?;
        let started_at = Instant::now();

        let result = insert_in_tx(&mut self.conn, &note);
        match result {
            Ok(id) => {
                info!(
                    "event=note_insert module=repo status=ok note_id={} keyword_count={} has_audio={} duration_ms={}",
                    id,
                    note.keywords.len(),
                    note.audio_uri.is_some(),
                    started_at.elapsed().as_millis()
                );
                Ok(note.into_note(id))
            }
            Err(err) => {
                error!(
                    "event=note_insert module=repo status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn get(&self, id: NoteId) -> NoteResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(read_raw_row(row)?.into_note()?)),
            None => Ok(None),
        }
    }

    fn list_all(&self) -> NoteResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY updated_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(read_raw_row(row)?.into_note()?);
        }
        Ok(notes)
    }

    fn delete_by_id(&mut self, id: NoteId) -> NoteResult<()> {
        let started_at = Instant::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        if changed == 0 {
            warn!(
                "event=note_delete module=repo status=error note_id={} duration_ms={} error_code=not_found",
                id,
                started_at.elapsed().as_millis()
            );
            return Err(NoteError::NotFound(id));
        }
        tx.commit()?;

        info!(
            "event=note_delete module=repo status=ok note_id={} duration_ms={}",
            id,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn count(&self) -> NoteResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

fn insert_in_tx(conn: &mut Connection, note: &NewNote) -> NoteResult<NoteId> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    tx.execute(
        "INSERT INTO notes (
            title,
            content,
            keywords,
            audio_uri,
            created_at,
            updated_at,
            is_sync,
            device_id,
            sync_metadata
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
        params![
            note.title.as_str(),
            note.content.as_str(),
            encode_keywords(&note.keywords),
            note.audio_uri.as_deref(),
            note.created_at,
            note.updated_at,
            bool_to_int(note.sync.is_sync),
            note.sync.device_id.as_str(),
            encode_extra(&note.sync.extra),
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

/// Column values as stored, before codec decoding.
struct RawNoteRow {
    id: NoteId,
    title: String,
    content: String,
    keywords: String,
    audio_uri: Option<String>,
    created_at: i64,
    updated_at: i64,
    is_sync: i64,
    device_id: String,
    sync_metadata: String,
}

fn read_raw_row(row: &Row<'_>) -> NoteResult<RawNoteRow> {
    Ok(RawNoteRow {
        id: read_column(row, "id")?,
        title: read_column(row, "title")?,
        content: read_column(row, "content")?,
        keywords: read_column(row, "keywords")?,
        audio_uri: read_column(row, "audio_uri")?,
        created_at: read_column(row, "created_at")?,
        updated_at: read_column(row, "updated_at")?,
        is_sync: read_column(row, "is_sync")?,
        device_id: read_column(row, "device_id")?,
        sync_metadata: read_column(row, "sync_metadata")?,
    })
}

/// Reads one column; a stored value of the wrong type is a corrupt record.
fn read_column<T: FromSql>(row: &Row<'_>, column: &'static str) -> NoteResult<T> {
    row.get(column).map_err(|err| match err {
        rusqlite::Error::InvalidColumnType(_, _, stored) => {
            NoteError::from(CodecError::corrupt(
                column,
                format!("unexpected stored type {stored}"),
            ))
        }
        rusqlite::Error::FromSqlConversionFailure(_, stored, source) => {
            NoteError::from(CodecError::corrupt(
                column,
                format!("cannot convert {stored}: {source}"),
            ))
        }
        rusqlite::Error::IntegralValueOutOfRange(_, value) => {
            NoteError::from(CodecError::corrupt(
                column,
                format!("integer {value} out of range"),
            ))
        }
        other => NoteError::from(other),
    })
}

impl RawNoteRow {
    fn into_note(self) -> NoteResult<Note> {
        let is_sync = match self.is_sync {
            0 => false,
            1 => true,
            other => {
                return Err(CodecError::corrupt(
                    "is_sync",
                    format!("expected 0 or 1, got {other} for note {}", self.id),
                )
                .into());
            }
        };

        let note = Note {
            id: self.id,
            title: self.title,
            content: self.content,
            keywords: decode_keywords(&self.keywords)?,
            audio_uri: self.audio_uri,
            created_at: self.created_at,
            updated_at: self.updated_at,
            sync: SyncMetadata {
                is_sync,
                device_id: self.device_id,
                extra: decode_extra(&self.sync_metadata)?,
            },
        };
        note.validate()
            .map_err(|err| CodecError::corrupt("notes", format!("note {}: {err}", note.id)))?;
        Ok(note)
    }
}

fn ensure_notes_table_ready(conn: &Connection) -> NoteResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(DbError::MissingRequiredTable("notes").into());
    }

    for &column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(DbError::MissingRequiredColumn {
                table: "notes",
                column,
            }
            .into());
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> NoteResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> NoteResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
