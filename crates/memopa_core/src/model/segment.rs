//! Document segment model.
//!
//! # Responsibility
//! - Define the two segment kinds a note document decomposes into.
//! - Define identity and equality rules shared by codec and editor.
//!
//! # Invariants
//! - Segment ids are unique within one document.
//! - Equality compares variant and every field, ids included.
//! - Freshly minted ids are random 128-bit values rendered as UUID strings.
//!
//! # See also
//! - crate::codec::marker

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque, stable identifier for one segment.
///
/// Card ids are carried verbatim inside persisted markers, so ids decoded from
/// older content may be any non-empty string, not only UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(String);

impl SegmentId {
    /// Mints a new collision-resistant id.
    pub fn mint() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing id string.
    ///
    /// Returns `None` for blank values; a blank id cannot be addressed later.
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    /// Canonical string form used in markers and across FFI.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for SegmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One element of a note document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Contiguous user-authored plain text.
    Text { id: SegmentId, content: String },
    /// Self-contained AI explanation unit.
    Card {
        id: SegmentId,
        title: String,
        body: String,
    },
}

impl Segment {
    /// Creates a text run with a freshly minted id.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            id: SegmentId::mint(),
            content: content.into(),
        }
    }

    /// Creates a card with a freshly minted id.
    pub fn card(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Card {
            id: SegmentId::mint(),
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn id(&self) -> &SegmentId {
        match self {
            Self::Text { id, .. } | Self::Card { id, .. } => id,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    pub fn is_card(&self) -> bool {
        matches!(self, Self::Card { .. })
    }

    /// Returns run content for text segments.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Self::Text { content, .. } => Some(content.as_str()),
            Self::Card { .. } => None,
        }
    }
}

/// Finds the position of a segment by id.
///
/// Linear scan; documents are editor-sized.
pub fn position_by_id(segments: &[Segment], id: &SegmentId) -> Option<usize> {
    segments.iter().position(|segment| segment.id() == id)
}

/// Finds a segment by id.
pub fn find_by_id<'a>(segments: &'a [Segment], id: &SegmentId) -> Option<&'a Segment> {
    segments.iter().find(|segment| segment.id() == id)
}

/// Restores the non-empty and trailing-text invariants in place.
///
/// Returns `true` when a text run had to be synthesized.
pub fn ensure_trailing_text(segments: &mut Vec<Segment>) -> bool {
    match segments.last() {
        Some(Segment::Text { .. }) => false,
        Some(Segment::Card { .. }) | None => {
            segments.push(Segment::text(""));
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ensure_trailing_text, find_by_id, Segment, SegmentId};

    #[test]
    fn minted_ids_are_unique() {
        assert_ne!(SegmentId::mint(), SegmentId::mint());
    }

    #[test]
    fn parse_rejects_blank_ids() {
        assert!(SegmentId::parse("  ").is_none());
        assert_eq!(
            SegmentId::parse("abc").map(|id| id.to_string()),
            Some("abc".to_string())
        );
    }

    #[test]
    fn equality_includes_ids() {
        let first = Segment::text("same");
        let second = Segment::text("same");
        assert_ne!(first, second);
        assert_eq!(first, first.clone());
    }

    #[test]
    fn ensure_trailing_text_handles_empty_and_card_tail() {
        let mut empty = Vec::new();
        assert!(ensure_trailing_text(&mut empty));
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].text_content(), Some(""));

        let mut card_tail = vec![Segment::text("a"), Segment::card("t", "b")];
        assert!(ensure_trailing_text(&mut card_tail));
        assert!(card_tail.last().is_some_and(Segment::is_text));

        let mut text_tail = vec![Segment::text("a")];
        assert!(!ensure_trailing_text(&mut text_tail));
        assert_eq!(text_tail.len(), 1);
    }

    #[test]
    fn find_by_id_scans_all_variants() {
        let card = Segment::card("title", "body");
        let segments = vec![Segment::text("x"), card.clone(), Segment::text("y")];
        assert_eq!(find_by_id(&segments, card.id()), Some(&card));
        assert!(find_by_id(&segments, &SegmentId::mint()).is_none());
    }

    #[test]
    fn serialization_uses_kind_tag() {
        let segment = Segment::Card {
            id: SegmentId::parse("abc").expect("valid id"),
            title: "T".to_string(),
            body: "B".to_string(),
        };
        let json = serde_json::to_value(&segment).expect("serialize segment");
        assert_eq!(json["kind"], "card");
        assert_eq!(json["id"], "abc");
        assert_eq!(json["title"], "T");
    }
}
