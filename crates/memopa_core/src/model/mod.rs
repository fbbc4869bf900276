//! Domain model for notes and their decomposed documents.
//!
//! # Responsibility
//! - Define the persisted note entity and the in-memory segment model.
//! - Define prompt templates consumed by the prompt assembler.
//!
//! # Invariants
//! - Notes are identified by a stable `NoteId`.
//! - Segments are identified by a `SegmentId` unique within one document.

pub mod note;
pub mod prompt;
pub mod segment;
