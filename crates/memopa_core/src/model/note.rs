//! Persisted note entity.
//!
//! # Responsibility
//! - Define the stored shape of one note.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `content` is the marker-encoded document; core never stores a second
//!   representation next to it.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable note identifier.
pub type NoteId = Uuid;

/// One persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Marker-encoded document body.
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Note {
    /// Creates a note with a generated id and the current timestamp.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), content, now_epoch_ms())
    }

    /// Creates a note from known identity, used by storage read-back.
    pub fn with_id(id: NoteId, content: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            content: content.into(),
            created_at,
        }
    }
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
