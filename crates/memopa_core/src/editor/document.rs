//! In-memory document for one open note.
//!
//! # Responsibility
//! - Own the segment sequence and per-run selection ranges.
//! - Re-establish document invariants whenever segments are replaced.
//!
//! # Invariants
//! - `segments` is never empty and always ends with a text run.
//! - Selection entries only exist for text runs present in `segments`.
//! - Each run keeps its own last-known range; focusing another run does not
//!   clear it.

use crate::codec::marker::decode;
use crate::editor::selection::{char_len, slice_chars, SelectionRange};
use crate::model::note::NoteId;
use crate::model::segment::{
    ensure_trailing_text, find_by_id, position_by_id, Segment, SegmentId,
};
use std::collections::HashMap;

/// Segment sequence plus selection state for one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    note_id: NoteId,
    segments: Vec<Segment>,
    selections: HashMap<SegmentId, SelectionRange>,
}

impl Document {
    /// Builds a document by decoding persisted note content.
    pub fn from_content(note_id: NoteId, content: &str) -> Self {
        let mut document = Self {
            note_id,
            segments: Vec::new(),
            selections: HashMap::new(),
        };
        document.replace_segments(decode(content));
        document
    }

    pub fn note_id(&self) -> NoteId {
        self.note_id
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the content of one text run.
    pub fn run_content(&self, run_id: &SegmentId) -> Option<&str> {
        find_by_id(&self.segments, run_id).and_then(Segment::text_content)
    }

    /// Id of the last text run; always present.
    pub fn last_run_id(&self) -> Option<&SegmentId> {
        self.segments
            .iter()
            .rev()
            .find(|segment| segment.is_text())
            .map(Segment::id)
    }

    /// Records a clamped selection for a text run.
    ///
    /// Returns the effective range, or `None` when `run_id` is not a text run.
    pub fn set_selection(
        &mut self,
        run_id: &SegmentId,
        range: SelectionRange,
    ) -> Option<SelectionRange> {
        let len = char_len(self.run_content(run_id)?);
        let effective = range.clamped(len);
        self.selections.insert(run_id.clone(), effective);
        Some(effective)
    }

    /// Returns the recorded range re-clamped against current content.
    pub fn selection(&self, run_id: &SegmentId) -> Option<SelectionRange> {
        let len = char_len(self.run_content(run_id)?);
        Some(
            self.selections
                .get(run_id)
                .copied()
                .unwrap_or_default()
                .clamped(len),
        )
    }

    pub(crate) fn reset_selection(&mut self, run_id: &SegmentId) {
        if self.selections.contains_key(run_id) {
            self.selections
                .insert(run_id.clone(), SelectionRange::default());
        }
    }

    /// Text the next explanation request operates on.
    ///
    /// An empty selection means the whole run.
    pub fn extract_target(&self, run_id: &SegmentId) -> Option<String> {
        let content = self.run_content(run_id)?;
        let range = self.selection(run_id).unwrap_or_default();
        if range.is_empty() {
            Some(content.to_string())
        } else {
            Some(slice_chars(content, range).to_string())
        }
    }

    /// Replaces one text run's content, keeping its id.
    pub(crate) fn set_run_content(&mut self, run_id: &SegmentId, new_content: String) -> bool {
        let Some(index) = position_by_id(&self.segments, run_id) else {
            return false;
        };
        match &mut self.segments[index] {
            Segment::Text { content, .. } => {
                *content = new_content;
                true
            }
            Segment::Card { .. } => false,
        }
    }

    pub(crate) fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    /// Installs a new segment sequence and restores invariants.
    pub(crate) fn replace_segments(&mut self, segments: Vec<Segment>) {
        self.segments = segments;
        ensure_trailing_text(&mut self.segments);
        let live = &self.segments;
        self.selections
            .retain(|id, _| live.iter().any(|segment| segment.is_text() && segment.id() == id));
    }
}
