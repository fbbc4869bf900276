//! Note document editor.
//!
//! # Responsibility
//! - Own the live document of one open note and funnel every external event
//!   (edit, selection, AI response, card swipe, clipboard) through one
//!   operation.
//! - Keep the note's persisted content in step with the segment sequence.
//!
//! # Invariants
//! - After every operation the document is non-empty and ends with a text run.
//! - At most one explanation request is in flight per editor.
//! - A started request always writes back a result, real or synthetic.
//!
//! # See also
//! - crate::codec::marker

pub mod clipboard;
pub mod document;
pub mod request;
pub mod selection;
pub mod session;
