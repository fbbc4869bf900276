//! Editing session for one open note.

use crate::ai::error::AiError;
use crate::ai::response::CardDraft;
use crate::codec::marker::{decode_preserving, encode, MARKER_PREFIX};
use crate::editor::clipboard::ClipboardSource;
use crate::editor::document::Document;
use crate::editor::selection::{byte_offset, card_insertion_point, char_len, SelectionRange};
use crate::model::note::Note;
use crate::model::prompt::PromptTemplate;
use crate::model::segment::{ensure_trailing_text, position_by_id, Segment, SegmentId};
use crate::prompt::assembler::{assemble_prompt, OutputFormat};
use log::{debug, info, warn};

/// Title of the card synthesized for transport and credential failures.
pub const ERROR_CARD_TITLE: &str = "Error";
/// Title of the card holding an unparseable response verbatim.
pub const RAW_RESPONSE_CARD_TITLE: &str = "AI Response";
/// Prefix of the heading line an adopted card renders into.
pub const ADOPTED_TITLE_PREFIX: &str = "■ ";

/// Externally visible editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Idle,
    AwaitingAiResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingExplanation {
    run_id: SegmentId,
    range: SelectionRange,
}

/// Owns the document of one note while it is open for editing.
#[derive(Debug, Clone)]
pub struct NoteEditor {
    note: Note,
    document: Document,
    focused_run: Option<SegmentId>,
    clipboard_suggestion: Option<String>,
    pending: Option<PendingExplanation>,
}

impl NoteEditor {
    /// Opens a note: decodes its content and, for an empty note, offers the
    /// clipboard text as a one-time suggestion.
    pub fn open(note: Note, clipboard: &impl ClipboardSource) -> Self {
        let document = Document::from_content(note.id, &note.content);
        let clipboard_suggestion = if note.content.is_empty() {
            clipboard.read().filter(|text| !text.trim().is_empty())
        } else {
            None
        };
        info!(
            "event=editor_open module=editor status=ok note_id={} segments={} \
             clipboard_suggestion={}",
            note.id,
            document.segments().len(),
            clipboard_suggestion.is_some()
        );
        Self {
            note,
            document,
            focused_run: None,
            clipboard_suggestion,
            pending: None,
        }
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    /// Consumes the editor after flushing segments into the note.
    pub fn into_note(mut self) -> Note {
        self.sync_to_note();
        self.note
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn segments(&self) -> &[Segment] {
        self.document.segments()
    }

    pub fn mode(&self) -> EditorMode {
        if self.pending.is_some() {
            EditorMode::AwaitingAiResponse
        } else {
            EditorMode::Idle
        }
    }

    pub fn focused_run(&self) -> Option<&SegmentId> {
        self.focused_run.as_ref()
    }

    pub fn clipboard_suggestion(&self) -> Option<&str> {
        self.clipboard_suggestion.as_deref()
    }

    /// Records the selection of a text run and focuses it.
    ///
    /// Returns the clamped range, or `None` for unknown runs and cards.
    pub fn set_selection(
        &mut self,
        run_id: &SegmentId,
        range: SelectionRange,
    ) -> Option<SelectionRange> {
        let effective = self.document.set_selection(run_id, range)?;
        self.focused_run = Some(run_id.clone());
        Some(effective)
    }

    pub fn selection(&self, run_id: &SegmentId) -> Option<SelectionRange> {
        self.document.selection(run_id)
    }

    pub fn extract_target(&self, run_id: &SegmentId) -> Option<String> {
        self.document.extract_target(run_id)
    }

    /// Replaces the content of one text run after a user edit.
    ///
    /// The run keeps its id; the note content is re-encoded without reparsing.
    pub fn update_text(&mut self, run_id: &SegmentId, content: impl Into<String>) -> bool {
        if !self.document.set_run_content(run_id, content.into()) {
            debug!(
                "event=editor_update_text module=editor status=skipped reason=unknown_run \
                 note_id={}",
                self.note.id
            );
            return false;
        }
        self.sync_to_note();
        true
    }

    /// Starts an explanation request for a text run.
    ///
    /// Returns the prompt to send, or `None` when a request is already in
    /// flight or the run does not exist. A returned prompt obliges the caller
    /// to report the outcome through [`NoteEditor::finish_explanation`].
    pub fn begin_explanation(
        &mut self,
        run_id: &SegmentId,
        template: &PromptTemplate,
        format: OutputFormat,
    ) -> Option<String> {
        if self.pending.is_some() {
            debug!(
                "event=explanation_request module=editor status=skipped reason=in_flight \
                 note_id={}",
                self.note.id
            );
            return None;
        }

        let target = self.document.extract_target(run_id)?;
        let range = self.document.selection(run_id).unwrap_or_default();
        let prompt = assemble_prompt(template, &target, format);
        self.pending = Some(PendingExplanation {
            run_id: run_id.clone(),
            range,
        });
        info!(
            "event=explanation_request module=editor status=start note_id={} target_chars={}",
            self.note.id,
            char_len(&target)
        );
        Some(prompt)
    }

    /// Completes the in-flight request and writes its result into the document.
    ///
    /// Failures become a single synthetic card placed where a successful
    /// response would have gone. Returns `false` when nothing was in flight.
    pub fn finish_explanation(&mut self, outcome: Result<Vec<CardDraft>, AiError>) -> bool {
        let Some(pending) = self.pending.take() else {
            warn!(
                "event=explanation_response module=editor status=ignored \
                 reason=not_in_flight note_id={}",
                self.note.id
            );
            return false;
        };

        let cards = match outcome {
            Ok(cards) => cards,
            Err(AiError::MalformedResponse(raw)) => {
                vec![CardDraft::new(RAW_RESPONSE_CARD_TITLE, raw)]
            }
            Err(err) => {
                warn!(
                    "event=explanation_response module=editor status=error note_id={} \
                     error_code={}",
                    self.note.id,
                    err.code()
                );
                vec![CardDraft::new(ERROR_CARD_TITLE, err.to_string())]
            }
        };

        if cards.is_empty() {
            info!(
                "event=explanation_response module=editor status=ok note_id={} cards=0",
                self.note.id
            );
            return true;
        }

        let (run_id, range) = if self.document.run_content(&pending.run_id).is_some() {
            (pending.run_id, pending.range)
        } else {
            // Target run vanished during the wait; append after the last run.
            let Some(last) = self.document.last_run_id().cloned() else {
                return true;
            };
            let end = self.document.run_content(&last).map_or(0, char_len);
            (last, SelectionRange::new(end, 0))
        };

        self.insert_cards(&run_id, &cards, range);
        info!(
            "event=explanation_response module=editor status=ok note_id={} cards={}",
            self.note.id,
            cards.len()
        );
        true
    }

    /// Splits a text run at the line boundary after `range` and inserts one
    /// card per draft, in order.
    ///
    /// Returns `false` without changes for an empty draft list or when
    /// `run_id` is not a text run.
    pub fn insert_cards(
        &mut self,
        run_id: &SegmentId,
        cards: &[CardDraft],
        range: SelectionRange,
    ) -> bool {
        if cards.is_empty() {
            return false;
        }
        let Some(index) = position_by_id(self.document.segments(), run_id) else {
            return false;
        };
        let Some(content) = self.document.segments()[index].text_content() else {
            return false;
        };

        let split_at = byte_offset(content, card_insertion_point(content, range));
        let (prefix, suffix) = content.split_at(split_at);
        let mut replacement = Vec::with_capacity(cards.len() + 2);
        replacement.push(Segment::Text {
            id: run_id.clone(),
            content: prefix.to_string(),
        });
        replacement.extend(cards.iter().map(|card| Segment::Card {
            id: SegmentId::mint(),
            title: card.title.clone(),
            body: card.body.clone(),
        }));
        replacement.push(Segment::text(suffix));

        self.document
            .segments_mut()
            .splice(index..=index, replacement);
        self.document.reset_selection(run_id);
        self.persist_round_trip();
        true
    }

    /// Merges a card into the surrounding text as a heading line plus body.
    ///
    /// Unknown ids (and ids of text runs) are a no-op.
    pub fn adopt_card(&mut self, card_id: &SegmentId) -> bool {
        let segments = self.document.segments();
        let Some(index) = position_by_id(segments, card_id) else {
            debug!(
                "event=card_adopt module=editor status=skipped reason=not_found note_id={}",
                self.note.id
            );
            return false;
        };
        let Segment::Card { title, body, .. } = &segments[index] else {
            return false;
        };
        let starts_mid_line = index
            .checked_sub(1)
            .and_then(|previous| segments[previous].text_content())
            .is_some_and(|text| !text.is_empty() && !text.ends_with('\n'));
        let rendered = render_adopted(title, body, starts_mid_line);

        self.document.segments_mut()[index] = Segment::text(rendered);
        self.persist_round_trip();
        info!(
            "event=card_adopt module=editor status=ok note_id={}",
            self.note.id
        );
        true
    }

    /// Collapses a card into a single newline.
    ///
    /// Unknown ids (and ids of text runs) are a no-op.
    pub fn discard_card(&mut self, card_id: &SegmentId) -> bool {
        let Some(index) = position_by_id(self.document.segments(), card_id) else {
            debug!(
                "event=card_discard module=editor status=skipped reason=not_found note_id={}",
                self.note.id
            );
            return false;
        };
        if !self.document.segments()[index].is_card() {
            return false;
        }

        self.document.segments_mut()[index] = Segment::text("\n");
        self.persist_round_trip();
        info!(
            "event=card_discard module=editor status=ok note_id={}",
            self.note.id
        );
        true
    }

    /// Appends the pending clipboard suggestion to the document.
    pub fn accept_clipboard_suggestion(&mut self) -> bool {
        let Some(suggestion) = self.clipboard_suggestion.take() else {
            return false;
        };
        let Some(last) = self.document.last_run_id().cloned() else {
            return false;
        };
        let mut content = self
            .document
            .run_content(&last)
            .unwrap_or_default()
            .to_string();
        content.push_str(&suggestion);
        self.document.set_run_content(&last, content);
        self.persist_round_trip();
        info!(
            "event=clipboard_accept module=editor status=ok note_id={} chars={}",
            self.note.id,
            char_len(&suggestion)
        );
        true
    }

    pub fn dismiss_clipboard_suggestion(&mut self) -> bool {
        self.clipboard_suggestion.take().is_some()
    }

    /// Re-encodes the segments into the note content.
    pub fn sync_to_note(&mut self) {
        self.note.content = encode(self.document.segments());
    }

    /// Encodes into the note, then rebuilds segments from that string so the
    /// in-memory state can never diverge from what is persisted.
    fn persist_round_trip(&mut self) {
        let mut segments = std::mem::take(self.document.segments_mut());
        ensure_trailing_text(&mut segments);
        self.note.content = encode(&segments);
        let reparsed = decode_preserving(&self.note.content, &segments);
        self.document.replace_segments(reparsed);
        if let Some(focused) = &self.focused_run {
            if self.document.run_content(focused).is_none() {
                self.focused_run = None;
            }
        }
    }
}

fn render_adopted(title: &str, body: &str, starts_mid_line: bool) -> String {
    let mut rendered = String::new();
    if starts_mid_line {
        rendered.push('\n');
    }
    if !title.is_empty() {
        rendered.push_str(ADOPTED_TITLE_PREFIX);
        rendered.push_str(title);
        rendered.push('\n');
    }
    if !body.is_empty() {
        rendered.push_str(body);
        rendered.push('\n');
    }
    // Adopted text is plain text; it must not reparse into a card.
    rendered.replace(MARKER_PREFIX, ADOPTED_MARKER_PREFIX)
}

const ADOPTED_MARKER_PREFIX: &str = "［CARD:";

#[cfg(test)]
mod tests {
    use super::render_adopted;

    #[test]
    fn render_adopted_starts_on_new_line_when_needed() {
        assert_eq!(render_adopted("T", "B", false), "■ T\nB\n");
        assert_eq!(render_adopted("T", "B", true), "\n■ T\nB\n");
        assert_eq!(render_adopted("", "B", false), "B\n");
    }

    #[test]
    fn render_adopted_never_emits_a_marker_prefix() {
        let rendered = render_adopted("[CARD: tag", "see [CARD:x:::T|||B]", false);
        assert_eq!(rendered, "■ ［CARD: tag\nsee ［CARD:x:::T|||B]\n");
    }
}
