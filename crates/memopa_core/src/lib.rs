//! Core logic for Memopa: notes with inline AI explanation cards.
//!
//! A note is one persisted string. Card markers embedded in it are decoded
//! into an ordered sequence of text runs and cards for editing, and every
//! structural edit is written back through the same codec.

pub mod ai;
pub mod codec;
pub mod config;
pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod prompt;
pub mod repo;
pub mod service;

pub use ai::collaborator::{
    AiCollaborator, CredentialedCollaborator, GenerateRequest, PromptTransport,
};
pub use ai::credential::{CredentialStore, MemoryCredentialStore};
pub use ai::error::{AiError, AiResult};
pub use ai::response::{parse_card_response, CardDraft};
pub use codec::marker::{decode, encode};
pub use config::AiSettings;
pub use db::{open_db, open_db_in_memory};
pub use editor::request::request_explanation;
pub use editor::selection::SelectionRange;
pub use editor::session::{EditorMode, NoteEditor};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId};
pub use model::prompt::{default_prompt_templates, PromptTemplate};
pub use model::segment::{Segment, SegmentId};
pub use prompt::assembler::{assemble_prompt, OutputFormat};
pub use repo::note_repo::{NoteListQuery, NoteRepository, SqliteNoteRepository};
pub use repo::{RepoError, RepoResult};
pub use service::note_service::{NoteService, NoteServiceError};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
