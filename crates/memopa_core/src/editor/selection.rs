//! Selection ranges over text runs.
//!
//! Offsets and lengths count Unicode scalar values (`char`s), never bytes, so
//! a range can never split a UTF-8 sequence.

use serde::{Deserialize, Serialize};

/// Selected span inside one text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionRange {
    pub location: usize,
    pub length: usize,
}

impl SelectionRange {
    pub fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    /// Clamps the range into `[0, content_len]`; never rejects input.
    pub fn clamped(self, content_len: usize) -> Self {
        let location = self.location.min(content_len);
        let length = self.length.min(content_len - location);
        Self { location, length }
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.location.saturating_add(self.length)
    }
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `char_index`-th char, or `text.len()` past the end.
pub(crate) fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Returns the clamped substring for `range`.
pub(crate) fn slice_chars(text: &str, range: SelectionRange) -> &str {
    let range = range.clamped(char_len(text));
    let start = byte_offset(text, range.location);
    let end = byte_offset(text, range.end());
    &text[start..end]
}

/// Char offset at which response cards are inserted for `range`.
///
/// Starts at the selection end (or the caret when nothing is selected) and
/// advances past the next newline at or after it; without one, the run end.
pub(crate) fn card_insertion_point(text: &str, range: SelectionRange) -> usize {
    let len = char_len(text);
    let end = if range.length > 0 {
        range.end().min(len)
    } else {
        range.location.min(len)
    };
    text.chars()
        .skip(end)
        .position(|ch| ch == '\n')
        .map_or(len, |offset| end + offset + 1)
}
