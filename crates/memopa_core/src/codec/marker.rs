//! Inline card marker codec.
//!
//! # Responsibility
//! - Encode an ordered segment sequence into the single persisted note string.
//! - Decode a persisted note string back into segments.
//!
//! # Invariants
//! - Encoding writes text runs verbatim and each card as
//!   `[CARD:<id>:::<title>|||<body>]`. Inside title and body, `\`, `[`, `]`
//!   and `|` are written as `\u{5c}`, `\u{5b}`, `\u{5d}` and `\u{7c}`, so an
//!   encoded field never contains a bracket or a pipe and every card decodes
//!   back to itself. Fields without those characters are written as-is.
//! - Decoding never fails. Unterminated or malformed markers stay plain text.
//! - A marker starts at the last `[CARD:` before its closing `]`; a stray
//!   `[CARD:` typed into a text run stays part of that run.
//! - Decoded output is never empty and always ends with a text run.
//! - Removing every card marker from the persisted string yields exactly the
//!   in-order concatenation of text run contents.
//! - Card ids are unique in decoded output; a duplicate or blank id is
//!   replaced by a freshly minted one.

use crate::model::segment::{Segment, SegmentId};
use log::debug;
use std::collections::HashSet;

pub const MARKER_PREFIX: &str = "[CARD:";
pub const MARKER_SUFFIX: char = ']';
pub const ID_SEPARATOR: &str = ":::";
pub const FIELD_SEPARATOR: &str = "|||";

/// Encodes segments into the persisted string form.
pub fn encode(segments: &[Segment]) -> String {
    let mut encoded = String::new();
    for segment in segments {
        match segment {
            Segment::Text { content, .. } => encoded.push_str(content),
            Segment::Card { id, title, body } => {
                encoded.push_str(&card_marker(id, title, body));
            }
        }
    }
    encoded
}

/// Renders the exact marker text for one card.
pub fn card_marker(id: &SegmentId, title: &str, body: &str) -> String {
    format!(
        "{MARKER_PREFIX}{id}{ID_SEPARATOR}{}{FIELD_SEPARATOR}{}{MARKER_SUFFIX}",
        escape_field(title),
        escape_field(body)
    )
}

const FIELD_ESCAPES: [(char, &str); 4] = [
    ('\\', "\\u{5c}"),
    ('[', "\\u{5b}"),
    (']', "\\u{5d}"),
    ('|', "\\u{7c}"),
];

fn escape_field(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match FIELD_ESCAPES.iter().find(|(raw, _)| *raw == ch) {
            Some((_, code)) => escaped.push_str(code),
            None => escaped.push(ch),
        }
    }
    escaped
}

// Unknown backslash sequences are kept, so legacy fields such as `C:\path`
// decode unchanged.
fn unescape_field(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(at) = rest.find('\\') {
        unescaped.push_str(&rest[..at]);
        let tail = &rest[at..];
        match FIELD_ESCAPES.iter().find(|(_, code)| tail.starts_with(code)) {
            Some((raw, code)) => {
                unescaped.push(*raw);
                rest = &tail[code.len()..];
            }
            None => {
                unescaped.push('\\');
                rest = &tail[1..];
            }
        }
    }
    unescaped.push_str(rest);
    unescaped
}

/// Decodes a persisted string, minting fresh ids for every text run.
pub fn decode(content: &str) -> Vec<Segment> {
    decode_preserving(content, &[])
}

/// Decodes a persisted string, reusing text run ids from `previous`.
///
/// A decoded run takes the id of the next not-yet-used previous run with
/// identical content (searching forward in order). Cards always take the id
/// carried in their marker.
pub fn decode_preserving(content: &str, previous: &[Segment]) -> Vec<Segment> {
    let mut ids = IdAllocator::new(previous);
    let mut segments = Vec::new();
    let mut pending = String::new();
    let mut cursor = 0;
    let mut degraded = 0usize;

    while let Some(found) = content[cursor..].find(MARKER_PREFIX) {
        let first_prefix = cursor + found;
        let inner_start = first_prefix + MARKER_PREFIX.len();
        let Some(close) = content[inner_start..].find(MARKER_SUFFIX) else {
            break;
        };
        let inner_end = inner_start + close;
        let marker_end = inner_end + MARKER_SUFFIX.len_utf8();
        let start = content[first_prefix..inner_end]
            .rfind(MARKER_PREFIX)
            .map_or(first_prefix, |offset| first_prefix + offset);
        if start != first_prefix {
            degraded += 1;
        }
        pending.push_str(&content[cursor..start]);

        match split_marker(&content[start + MARKER_PREFIX.len()..inner_end]) {
            Some((id_part, title, body)) => {
                if !pending.is_empty() {
                    let text = std::mem::take(&mut pending);
                    segments.push(Segment::Text {
                        id: ids.text_id(&text),
                        content: text,
                    });
                }
                segments.push(Segment::Card {
                    id: ids.card_id(id_part),
                    title: unescape_field(title),
                    body: unescape_field(body),
                });
            }
            None => {
                pending.push_str(&content[start..marker_end]);
                degraded += 1;
            }
        }
        cursor = marker_end;
    }

    if content[cursor..].contains(MARKER_PREFIX) {
        degraded += 1;
    }
    pending.push_str(&content[cursor..]);
    segments.push(Segment::Text {
        id: ids.text_id(&pending),
        content: pending,
    });

    if degraded > 0 {
        debug!(
            "event=marker_decode module=codec status=degraded malformed_markers={} segments={}",
            degraded,
            segments.len()
        );
    }

    segments
}

/// Concatenates text run contents, skipping cards.
pub fn plain_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .filter_map(Segment::text_content)
        .collect::<String>()
}

fn split_marker(inner: &str) -> Option<(&str, &str, &str)> {
    let (id_part, rest) = inner.split_once(ID_SEPARATOR)?;
    let (title, body) = rest.split_once(FIELD_SEPARATOR)?;
    Some((id_part, title, body))
}

struct IdAllocator<'a> {
    previous_runs: Vec<(&'a SegmentId, &'a str)>,
    next_run: usize,
    used: HashSet<SegmentId>,
}

impl<'a> IdAllocator<'a> {
    fn new(previous: &'a [Segment]) -> Self {
        let previous_runs = previous
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text { id, content } => Some((id, content.as_str())),
                Segment::Card { .. } => None,
            })
            .collect();
        Self {
            previous_runs,
            next_run: 0,
            used: HashSet::new(),
        }
    }

    fn text_id(&mut self, content: &str) -> SegmentId {
        let candidate = self.previous_runs[self.next_run..]
            .iter()
            .position(|(_, previous)| *previous == content)
            .map(|offset| self.next_run + offset);

        if let Some(index) = candidate {
            self.next_run = index + 1;
            let id = self.previous_runs[index].0;
            if !self.used.contains(id) {
                self.used.insert(id.clone());
                return id.clone();
            }
        }
        self.fresh()
    }

    fn card_id(&mut self, raw: &str) -> SegmentId {
        match SegmentId::parse(raw) {
            Some(id) if !self.used.contains(&id) => {
                self.used.insert(id.clone());
                id
            }
            _ => self.fresh(),
        }
    }

    fn fresh(&mut self) -> SegmentId {
        let id = SegmentId::mint();
        self.used.insert(id.clone());
        id
    }
}
