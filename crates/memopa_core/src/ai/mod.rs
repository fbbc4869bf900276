//! AI collaborator contracts and glue.
//!
//! # Responsibility
//! - Define the consumed contract for generating explanation cards.
//! - Parse structured card responses and normalize failures into `AiError`.
//! - Compose a credential store and a host transport into a collaborator.
//!
//! # Invariants
//! - Network transport lives outside core; core only sees `PromptTransport`.
//! - API keys are never logged.

pub mod collaborator;
pub mod credential;
pub mod error;
pub mod models;
pub mod response;
