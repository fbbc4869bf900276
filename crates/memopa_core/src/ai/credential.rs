//! Credential store contract.
//!
//! # Responsibility
//! - Define how core reads the generative API key.
//! - Normalize keys before they are stored.
//!
//! # Invariants
//! - Stored keys are trimmed and at least `MIN_API_KEY_CHARS` long.
//! - Key material never appears in logs or error messages.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, PoisonError};

/// Shortest key accepted; real keys are ~39 characters.
pub const MIN_API_KEY_CHARS: usize = 30;

/// Platform secure storage for the API key.
///
/// Implementations live in the host app (keychain/keystore); core ships an
/// in-memory store for tests and headless tools.
pub trait CredentialStore {
    fn load(&self) -> Option<String>;
    fn save(&self, key: &str) -> Result<(), CredentialError>;
    fn delete(&self);
}

/// Key validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    Blank,
    TooShort { chars: usize, min: usize },
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "API key must not be blank"),
            Self::TooShort { chars, min } => {
                write!(f, "API key looks truncated: {chars} chars, expected at least {min}")
            }
        }
    }
}

impl Error for CredentialError {}

/// Trims a pasted key and rejects obviously invalid values.
pub fn normalize_api_key(raw: &str) -> Result<String, CredentialError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CredentialError::Blank);
    }
    let chars = trimmed.chars().count();
    if chars < MIN_API_KEY_CHARS {
        return Err(CredentialError::TooShort {
            chars,
            min: MIN_API_KEY_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

/// Process-local credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    key: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.key
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, key: &str) -> Result<(), CredentialError> {
        let normalized = normalize_api_key(key)?;
        *self.key.lock().unwrap_or_else(PoisonError::into_inner) = Some(normalized);
        Ok(())
    }

    fn delete(&self) {
        *self.key.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
