//! AI request error taxonomy.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AiResult<T> = Result<T, AiError>;

/// Failure modes of one explanation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    /// No API key is stored.
    CredentialMissing,
    /// The remote service rejected the stored key.
    InvalidCredential,
    /// Request could not be delivered or returned a non-success status.
    TransportFailure(String),
    /// Response arrived but could not be parsed; carries the raw text.
    MalformedResponse(String),
}

impl AiError {
    /// Stable short code used in logs and across FFI.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CredentialMissing => "credential_missing",
            Self::InvalidCredential => "invalid_credential",
            Self::TransportFailure(_) => "transport_failure",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

impl Display for AiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CredentialMissing => write!(f, "API key is not configured"),
            Self::InvalidCredential => write!(f, "API key was rejected by the service"),
            Self::TransportFailure(details) => write!(f, "request failed: {details}"),
            Self::MalformedResponse(raw) => {
                write!(f, "response could not be parsed ({} chars)", raw.chars().count())
            }
        }
    }
}

impl Error for AiError {}
