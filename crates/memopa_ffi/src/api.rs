//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note storage and open-editor operations to Dart via FRB.
//! - Keep one `NoteEditor` per open note in a process-wide registry.
//! - Hand prompts to the host for transport and parse what comes back.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every content change made through an editor call is saved before the
//!   call returns. A failed save leaves the session dirty and the next call
//!   retries it.
//! - Segment ids, note ids and error codes cross the boundary as strings.

use log::{info, warn};
use memopa_core::ai::credential::normalize_api_key;
use memopa_core::ai::models::{parse_model, supported_model_ids};
use memopa_core::db::open_db;
use memopa_core::service::note_service::note_preview;
use memopa_core::{
    core_version as core_version_inner, default_prompt_templates,
    init_logging as init_logging_inner, parse_card_response, ping as ping_inner, AiError,
    AiSettings, NoteEditor, NoteId, NoteService, NoteServiceError, PromptTemplate, Segment,
    SegmentId, SelectionRange, SqliteNoteRepository,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use uuid::Uuid;

const NOTES_DB_FILE_NAME: &str = "memopa_notes.sqlite3";
static NOTES_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static OPEN_EDITORS: OnceLock<Mutex<HashMap<NoteId, OpenEditor>>> = OnceLock::new();

/// Registry entry: the live editor plus the content last written to the DB.
struct OpenEditor {
    editor: NoteEditor,
    saved_content: String,
}

impl OpenEditor {
    fn new(editor: NoteEditor) -> Self {
        let saved_content = editor.note().content.clone();
        Self {
            editor,
            saved_content,
        }
    }

    fn is_dirty(&self) -> bool {
        self.editor.note().content != self.saved_content
    }
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error`; `log_dir`: absolute path.
/// - Idempotent for the same arguments.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One row of the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub note_id: String,
    /// Text-only preview; `None` for empty or card-only notes.
    pub preview: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// Note list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListResponse {
    pub items: Vec<NoteItem>,
    pub applied_limit: u32,
    pub message: String,
}

/// Generic action envelope for note-level commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    pub note_id: Option<String>,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: NoteId) -> Self {
        Self {
            ok: true,
            note_id: Some(note_id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

/// Segment variant tag for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Text,
    Card,
}

/// Flattened segment for rendering.
///
/// Text runs carry `content`, cards carry `title`/`body`; the other fields
/// are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentView {
    pub id: String,
    pub kind: SegmentKind,
    pub content: String,
    pub title: String,
    pub body: String,
}

impl From<&Segment> for SegmentView {
    fn from(segment: &Segment) -> Self {
        match segment {
            Segment::Text { id, content } => Self {
                id: id.to_string(),
                kind: SegmentKind::Text,
                content: content.clone(),
                title: String::new(),
                body: String::new(),
            },
            Segment::Card { id, title, body } => Self {
                id: id.to_string(),
                kind: SegmentKind::Card,
                content: String::new(),
                title: title.clone(),
                body: body.clone(),
            },
        }
    }
}

/// Snapshot of an open editor after one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorResponse {
    /// `false` when the call could not run or its save failed. A failed save
    /// still carries the current segments.
    pub ok: bool,
    /// Whether the call changed the note content.
    pub changed: bool,
    pub segments: Vec<SegmentView>,
    pub awaiting_ai: bool,
    pub clipboard_suggestion: Option<String>,
    pub message: String,
}

impl EditorResponse {
    fn snapshot(editor: &NoteEditor, changed: bool, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed,
            segments: editor.segments().iter().map(SegmentView::from).collect(),
            awaiting_ai: editor.mode() == memopa_core::EditorMode::AwaitingAiResponse,
            clipboard_suggestion: editor.clipboard_suggestion().map(str::to_string),
            message: message.into(),
        }
    }

    fn unsaved(editor: &NoteEditor, changed: bool, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            ..Self::snapshot(editor, changed, message)
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            segments: Vec::new(),
            awaiting_ai: false,
            clipboard_suggestion: None,
            message: message.into(),
        }
    }
}

/// Prompt handed to the host for one explanation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationPrompt {
    pub ok: bool,
    /// `None` when a request is already in flight or the run is unknown.
    pub prompt: Option<String>,
    /// Model id the host should call.
    pub model: String,
    pub timeout_secs: u64,
    pub message: String,
}

/// Generative model choice for the settings picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelItem {
    pub id: String,
    pub display_name: String,
}

/// Built-in prompt button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplateItem {
    pub id: String,
    pub name: String,
    pub instruction_text: String,
    pub enabled: bool,
}

/// Creates a note from marker-encoded content.
#[flutter_rust_bridge::frb(sync)]
pub fn note_create(content: String) -> NoteActionResponse {
    match with_note_service(|service| service.create_note(content)) {
        Ok(note) => NoteActionResponse::success("Note created.", note.id),
        Err(err) => NoteActionResponse::failure(format!("note_create failed: {err}")),
    }
}

/// Lists notes newest first; `limit` defaults to 20 and clamps to 100.
#[flutter_rust_bridge::frb(sync)]
pub fn note_list(limit: Option<u32>, offset: u32) -> NoteListResponse {
    match with_note_service(|service| service.list_notes(limit, offset)) {
        Ok(result) => {
            let items = result
                .items
                .into_iter()
                .map(|note| NoteItem {
                    note_id: note.id.to_string(),
                    preview: note_preview(&note.content),
                    created_at: note.created_at,
                })
                .collect::<Vec<_>>();
            NoteListResponse {
                message: format!("Found {} note(s).", items.len()),
                items,
                applied_limit: result.applied_limit,
            }
        }
        Err(err) => NoteListResponse {
            items: Vec::new(),
            applied_limit: 0,
            message: format!("note_list failed: {err}"),
        },
    }
}

/// Deletes a note and drops its editor session, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(note_id: String) -> NoteActionResponse {
    let Some(id) = parse_note_id(&note_id) else {
        return NoteActionResponse::failure(format!("invalid note id `{note_id}`"));
    };
    lock_editors().remove(&id);
    match with_note_service(|service| service.delete_note(id)) {
        Ok(()) => NoteActionResponse::success("Note deleted.", id),
        Err(err) => NoteActionResponse::failure(format!("note_delete failed: {err}")),
    }
}

/// Opens a note for editing, or returns the session that is already open.
///
/// `clipboard_text` is what the host read from the system clipboard; it is
/// only offered for empty notes.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_open(note_id: String, clipboard_text: Option<String>) -> EditorResponse {
    let Some(id) = parse_note_id(&note_id) else {
        return EditorResponse::failure(format!("invalid note id `{note_id}`"));
    };
    let mut editors = lock_editors();
    if let Some(open) = editors.get(&id) {
        return EditorResponse::snapshot(&open.editor, false, "Editor already open.");
    }

    match with_note_service(|service| service.open_editor(id, &clipboard_text)) {
        Ok(editor) => {
            let response = EditorResponse::snapshot(&editor, false, "Editor opened.");
            editors.insert(id, OpenEditor::new(editor));
            response
        }
        Err(err) => EditorResponse::failure(format!("editor_open failed: {err}")),
    }
}

/// Returns the current segments of an open note.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_segments(note_id: String) -> EditorResponse {
    with_open_editor(&note_id, "editor_segments", |_| true)
}

/// Records a char-offset selection for a text run; out-of-range values clamp.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_set_selection(
    note_id: String,
    run_id: String,
    location: u32,
    length: u32,
) -> EditorResponse {
    let Some(run_id) = SegmentId::parse(&run_id) else {
        return EditorResponse::failure("run id must not be blank");
    };
    let range = SelectionRange::new(location as usize, length as usize);
    with_open_editor(&note_id, "editor_set_selection", |editor| {
        editor.set_selection(&run_id, range).is_some()
    })
}

/// Replaces the content of one text run after a user edit.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_update_text(note_id: String, run_id: String, content: String) -> EditorResponse {
    let Some(run_id) = SegmentId::parse(&run_id) else {
        return EditorResponse::failure("run id must not be blank");
    };
    with_open_editor(&note_id, "editor_update_text", |editor| {
        editor.update_text(&run_id, content)
    })
}

/// Starts an explanation request and returns the prompt for the host to send.
///
/// `settings_json` is the persisted AI settings blob; `None` uses defaults.
/// A returned prompt must be answered with `editor_finish_explanation`.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_begin_explanation(
    note_id: String,
    run_id: String,
    template_name: String,
    instruction_text: String,
    settings_json: Option<String>,
) -> ExplanationPrompt {
    let settings = match settings_json.as_deref() {
        Some(raw) => match AiSettings::from_json_str(raw) {
            Ok(settings) => settings,
            Err(err) => return explanation_failure(format!("invalid AI settings: {err}")),
        },
        None => AiSettings::default(),
    };
    let Some(id) = parse_note_id(&note_id) else {
        return explanation_failure(format!("invalid note id `{note_id}`"));
    };
    let Some(run_id) = SegmentId::parse(&run_id) else {
        return explanation_failure("run id must not be blank");
    };

    let mut editors = lock_editors();
    let Some(open) = editors.get_mut(&id) else {
        return explanation_failure(format!("note {id} is not open"));
    };
    let template = PromptTemplate::new(template_name, instruction_text);
    let prompt = open.editor.begin_explanation(&run_id, &template, settings.output_format);
    let message = if prompt.is_some() {
        "Prompt ready."
    } else {
        "Request skipped."
    };
    ExplanationPrompt {
        ok: true,
        prompt,
        model: settings.model,
        timeout_secs: settings.request_timeout_secs,
        message: message.to_string(),
    }
}

/// Completes the in-flight request with what the host transport produced.
///
/// `error_kind` is `None` on success; otherwise one of `credential_missing`,
/// `invalid_credential` or `transport_failure`, with details in
/// `response_text`.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_finish_explanation(
    note_id: String,
    response_text: Option<String>,
    error_kind: Option<String>,
) -> EditorResponse {
    let outcome = match error_kind.as_deref() {
        None => parse_card_response(response_text.as_deref().unwrap_or_default()),
        Some(kind) => Err(host_error(kind, response_text)),
    };
    with_open_editor(&note_id, "editor_finish_explanation", |editor| {
        editor.finish_explanation(outcome)
    })
}

/// Merges a card into the surrounding text.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_adopt_card(note_id: String, card_id: String) -> EditorResponse {
    let Some(card_id) = SegmentId::parse(&card_id) else {
        return EditorResponse::failure("card id must not be blank");
    };
    with_open_editor(&note_id, "editor_adopt_card", |editor| {
        editor.adopt_card(&card_id)
    })
}

/// Collapses a card into a single newline.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_discard_card(note_id: String, card_id: String) -> EditorResponse {
    let Some(card_id) = SegmentId::parse(&card_id) else {
        return EditorResponse::failure("card id must not be blank");
    };
    with_open_editor(&note_id, "editor_discard_card", |editor| {
        editor.discard_card(&card_id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn editor_accept_clipboard(note_id: String) -> EditorResponse {
    with_open_editor(&note_id, "editor_accept_clipboard", |editor| {
        editor.accept_clipboard_suggestion()
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn editor_dismiss_clipboard(note_id: String) -> EditorResponse {
    with_open_editor(&note_id, "editor_dismiss_clipboard", |editor| {
        editor.dismiss_clipboard_suggestion()
    })
}

/// Saves and drops the editor session of a note.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_close(note_id: String) -> NoteActionResponse {
    let Some(id) = parse_note_id(&note_id) else {
        return NoteActionResponse::failure(format!("invalid note id `{note_id}`"));
    };
    let mut editors = lock_editors();
    let Some(open) = editors.remove(&id) else {
        return NoteActionResponse::failure(format!("note {id} is not open"));
    };
    match with_note_service(|service| service.save_editor(&open.editor)) {
        Ok(()) => NoteActionResponse::success("Editor closed.", id),
        Err(err) => {
            // Keep the session so unsaved content is not dropped.
            editors.insert(id, open);
            NoteActionResponse::failure(format!("editor_close failed: {err}"))
        }
    }
}

/// Validates a pasted API key; empty string on success, message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn ai_validate_api_key(raw: String) -> String {
    match normalize_api_key(&raw) {
        Ok(_) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Supported models in picker order.
#[flutter_rust_bridge::frb(sync)]
pub fn ai_supported_models() -> Vec<ModelItem> {
    supported_model_ids()
        .iter()
        .filter_map(|id| parse_model(id).ok())
        .map(|model| ModelItem {
            id: model.as_str().to_string(),
            display_name: model.display_name().to_string(),
        })
        .collect()
}

/// Built-in prompt buttons shown before the user customizes them.
#[flutter_rust_bridge::frb(sync)]
pub fn prompt_default_templates() -> Vec<PromptTemplateItem> {
    default_prompt_templates()
        .into_iter()
        .map(|template| PromptTemplateItem {
            id: template.id.to_string(),
            name: template.name,
            instruction_text: template.instruction_text,
            enabled: template.enabled,
        })
        .collect()
}

fn explanation_failure(message: impl Into<String>) -> ExplanationPrompt {
    ExplanationPrompt {
        ok: false,
        prompt: None,
        model: String::new(),
        timeout_secs: 0,
        message: message.into(),
    }
}

fn host_error(kind: &str, details: Option<String>) -> AiError {
    match kind {
        "credential_missing" => AiError::CredentialMissing,
        "invalid_credential" => AiError::InvalidCredential,
        other => AiError::TransportFailure(details.unwrap_or_else(|| other.to_string())),
    }
}

fn parse_note_id(raw: &str) -> Option<NoteId> {
    Uuid::parse_str(raw.trim()).ok()
}

fn lock_editors() -> MutexGuard<'static, HashMap<NoteId, OpenEditor>> {
    OPEN_EDITORS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Runs `op` on an open editor and saves when the note content changed.
///
/// `op` reports whether it applied; a non-applied call still returns a
/// snapshot so the UI can resync.
fn with_open_editor(
    note_id: &str,
    call: &'static str,
    op: impl FnOnce(&mut NoteEditor) -> bool,
) -> EditorResponse {
    let Some(id) = parse_note_id(note_id) else {
        return EditorResponse::failure(format!("{call} failed: invalid note id `{note_id}`"));
    };
    let mut editors = lock_editors();
    let Some(open) = editors.get_mut(&id) else {
        return EditorResponse::failure(format!("{call} failed: note {id} is not open"));
    };
    apply_and_save(open, id, call, op, |editor| {
        with_note_service(|service| service.save_editor(editor))
    })
}

/// Applies `op` and saves whenever the session holds unsaved content,
/// including content left over from an earlier failed save.
fn apply_and_save(
    open: &mut OpenEditor,
    id: NoteId,
    call: &'static str,
    op: impl FnOnce(&mut NoteEditor) -> bool,
    save: impl FnOnce(&NoteEditor) -> Result<(), String>,
) -> EditorResponse {
    let before = open.editor.note().content.clone();
    let applied = op(&mut open.editor);
    let changed = open.editor.note().content != before;
    if open.is_dirty() {
        if let Err(err) = save(&open.editor) {
            warn!("event=editor_save module=ffi status=error call={call} note_id={id} error={err}");
            return EditorResponse::unsaved(&open.editor, changed, format!("{call} failed: {err}"));
        }
        open.saved_content = open.editor.note().content.clone();
        info!("event=editor_save module=ffi status=ok call={call} note_id={id}");
    }

    let message = if applied { "ok" } else { "no change" };
    EditorResponse::snapshot(&open.editor, changed, message)
}

fn resolve_notes_db_path() -> PathBuf {
    NOTES_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("MEMOPA_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(NOTES_DB_FILE_NAME)
        })
        .clone()
}

fn with_note_service<T>(
    f: impl FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, NoteServiceError>,
) -> Result<T, String> {
    let conn = open_db(resolve_notes_db_path())
        .map_err(|err| format!("notes DB open failed: {err}"))?;
    let service = NoteService::new(SqliteNoteRepository::new(&conn));
    f(&service).map_err(|err| err.to_string())
}
