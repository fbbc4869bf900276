//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/delete APIs over a `NoteRepository`.
//! - Open notes into a `NoteEditor` and persist the editor's content.
//! - Derive list previews from the text runs of a note.
//!
//! # Invariants
//! - Persisted content is always the editor's marker-encoded string.
//! - Note list is sorted by `created_at DESC, uuid ASC`.
//! - Previews never contain card marker text.

use crate::codec::marker::{decode, plain_text};
use crate::editor::clipboard::ClipboardSource;
use crate::editor::session::NoteEditor;
use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{normalize_note_limit, NoteListQuery, NoteRepository};
use crate::repo::{RepoError, RepoResult};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PREVIEW_MAX_CHARS: usize = 100;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResult {
    /// Items sorted newest first.
    pub items: Vec<Note>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note from already marker-encoded content.
    pub fn create_note(&self, content: impl Into<String>) -> Result<Note, NoteServiceError> {
        let note = Note::new(content);
        let id = self.repo.create_note(&note)?;
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.get_note(id)
    }

    pub fn list_notes(
        &self,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<NotesListResult, NoteServiceError> {
        let applied_limit = normalize_note_limit(limit);
        let items = self.repo.list_notes(&NoteListQuery {
            limit: Some(applied_limit),
            offset,
        })?;
        Ok(NotesListResult {
            items,
            applied_limit,
        })
    }

    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete_note(id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    /// Loads a note and opens it for editing.
    pub fn open_editor(
        &self,
        id: NoteId,
        clipboard: &impl ClipboardSource,
    ) -> Result<NoteEditor, NoteServiceError> {
        let note = self
            .repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))?;
        Ok(NoteEditor::open(note, clipboard))
    }

    /// Writes the editor's current content back to storage.
    pub fn save_editor(&self, editor: &NoteEditor) -> Result<(), NoteServiceError> {
        let note = editor.note();
        self.repo.update_note_content(note.id, &note.content)?;
        info!(
            "event=note_save module=service status=ok note_id={} content_chars={}",
            note.id,
            note.content.chars().count()
        );
        Ok(())
    }
}

/// Derives a one-line preview from the text runs of persisted content.
///
/// Cards are skipped, whitespace is collapsed and the first 100 chars kept.
pub fn note_preview(content: &str) -> Option<String> {
    let text = plain_text(&decode(content));
    let collapsed = WHITESPACE_RE.replace_all(&text, " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}
