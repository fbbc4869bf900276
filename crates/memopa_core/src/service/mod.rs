//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Hand open notes to the editor and persist what it produces.

pub mod note_service;
