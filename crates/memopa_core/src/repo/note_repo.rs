//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Store note content verbatim, card markers included.
//! - Serve newest-first paginated listings.
//!
//! # Invariants
//! - Content is never rewritten on the way in or out.
//! - `list_notes` orders by `created_at DESC, uuid ASC`.

use crate::model::note::{Note, NoteId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const NOTES_DEFAULT_LIMIT: u32 = 20;
const NOTES_LIMIT_MAX: u32 = 100;

const NOTE_SELECT_SQL: &str = "SELECT uuid, content, created_at FROM notes";

/// Pagination for note listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteListQuery {
    /// Maximum rows to return. Defaults to 20 and clamps to 100.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for note persistence.
pub trait NoteRepository {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Replaces stored content; `NotFound` when the note does not exist.
    fn update_note_content(&self, id: NoteId, content: &str) -> RepoResult<()>;
    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>>;
    /// Removes a note; `NotFound` when it does not exist.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (uuid, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3);",
            params![note.id.to_string(), note.content, note.created_at],
        )?;
        Ok(note.id)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let sql = format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;");
        let row = self
            .conn
            .query_row(&sql, [id.to_string()], read_row)
            .optional()?;
        row.map(into_note).transpose()
    }

    fn update_note_content(&self, id: NoteId, content: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET content = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), content],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>> {
        let sql =
            format!("{NOTE_SELECT_SQL} ORDER BY created_at DESC, uuid ASC LIMIT ?1 OFFSET ?2;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![
            i64::from(normalize_note_limit(query.limit)),
            i64::from(query.offset)
        ])?;

        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(into_note(read_row(row)?)?);
        }
        Ok(notes)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

/// Normalizes list limit: zero or missing takes the default, large values clamp.
pub fn normalize_note_limit(limit: Option<u32>) -> u32 {
    match limit {
        None | Some(0) => NOTES_DEFAULT_LIMIT,
        Some(value) => value.min(NOTES_LIMIT_MAX),
    }
}

type RawNoteRow = (String, String, i64);

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawNoteRow> {
    Ok((row.get("uuid")?, row.get("content")?, row.get("created_at")?))
}

fn into_note((uuid, content, created_at): RawNoteRow) -> RepoResult<Note> {
    let id = Uuid::parse_str(&uuid)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{uuid}` in notes.uuid")))?;
    Ok(Note::with_id(id, content, created_at))
}
