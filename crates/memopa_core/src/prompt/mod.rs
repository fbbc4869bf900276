//! Prompt construction for explanation requests.
//!
//! # Responsibility
//! - Turn a prompt template and a target text extract into the literal
//!   instruction sent to the AI collaborator.
//!
//! # Invariants
//! - Assembly is pure: no I/O, no state, deterministic output.

pub mod assembler;
