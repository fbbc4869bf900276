//! Persisted string codec for note documents.
//!
//! # Responsibility
//! - Map between the in-memory segment sequence and the single string stored
//!   on a note.
//!
//! # See also
//! - crate::editor

pub mod marker;
