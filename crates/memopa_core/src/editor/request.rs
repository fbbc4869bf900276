//! Explanation request flow.
//!
//! # Responsibility
//! - Drive one explanation request from prompt to written-back cards.
//!
//! # Invariants
//! - The editor is never borrowed across the AI call, so selection, adopt and
//!   discard stay usable while a request is outstanding.
//! - A second request issued while one is in flight is dropped without an
//!   outbound call.

use crate::ai::collaborator::AiCollaborator;
use crate::editor::session::NoteEditor;
use crate::model::prompt::PromptTemplate;
use crate::model::segment::SegmentId;
use crate::prompt::assembler::OutputFormat;
use std::cell::RefCell;

/// Requests an explanation for a text run and inserts the outcome.
///
/// Returns `false` when the request was dropped (already in flight or unknown
/// run), `true` once a result has been written back.
pub async fn request_explanation<A: AiCollaborator>(
    editor: &RefCell<NoteEditor>,
    run_id: &SegmentId,
    template: &PromptTemplate,
    format: OutputFormat,
    collaborator: &A,
) -> bool {
    let prompt = editor
        .borrow_mut()
        .begin_explanation(run_id, template, format);
    let Some(prompt) = prompt else {
        return false;
    };

    let outcome = collaborator.generate(&prompt).await;
    editor.borrow_mut().finish_explanation(outcome)
}
