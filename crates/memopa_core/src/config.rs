//! AI request settings.
//!
//! # Responsibility
//! - Hold user-selectable AI options (model, output shape, timeout).
//! - Load them from the JSON blob the host app persists.
//!
//! # Invariants
//! - A validated `AiSettings` always names a supported model.
//! - `request_timeout_secs` is never zero.

use crate::ai::models::{parse_model, ModelError, DEFAULT_MODEL_ID};
use crate::prompt::assembler::OutputFormat;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings consumed when dispatching explanation requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSettings {
    /// Generative model id.
    #[serde(default = "default_model")]
    pub model: String,
    /// Whether prompts ask for multi-card JSON output.
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Upper bound handed to the host transport.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            output_format: OutputFormat::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AiSettings {
    /// Parses and validates settings from JSON; missing fields take defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(raw).map_err(|err| SettingsError::InvalidJson(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks model support and timeout bounds.
    pub fn validate(&self) -> Result<(), SettingsError> {
        parse_model(&self.model)?;
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Settings load/validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    InvalidJson(String),
    Model(ModelError),
    ZeroTimeout,
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(message) => write!(f, "invalid AI settings JSON: {message}"),
            Self::Model(err) => write!(f, "{err}"),
            Self::ZeroTimeout => write!(f, "request_timeout_secs must be greater than zero"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for SettingsError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

fn default_model() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::{AiSettings, SettingsError};
    use crate::ai::models::ModelError;
    use crate::prompt::assembler::OutputFormat;
    use std::time::Duration;

    #[test]
    fn empty_object_takes_defaults() {
        let settings = AiSettings::from_json_str("{}").expect("defaults");
        assert_eq!(settings, AiSettings::default());
        assert_eq!(settings.model, "gemini-flash-latest");
        assert_eq!(settings.output_format, OutputFormat::StructuredCards);
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn parses_explicit_fields() {
        let settings = AiSettings::from_json_str(
            r#"{"model": "gemini-2.5-pro",
                "output_format": "plain_text",
                "request_timeout_secs": 10}"#,
        )
        .expect("explicit settings");
        assert_eq!(settings.model, "gemini-2.5-pro");
        assert_eq!(settings.output_format, OutputFormat::PlainText);
        assert_eq!(settings.request_timeout_secs, 10);
    }

    #[test]
    fn rejects_unknown_model_and_zero_timeout() {
        let err = AiSettings::from_json_str(r#"{"model": "other"}"#).expect_err("unknown model");
        assert_eq!(
            err,
            SettingsError::Model(ModelError::UnsupportedModel("other".to_string()))
        );

        let err = AiSettings::from_json_str(r#"{"request_timeout_secs": 0}"#)
            .expect_err("zero timeout");
        assert_eq!(err, SettingsError::ZeroTimeout);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = AiSettings::from_json_str("not json").expect_err("malformed");
        assert!(matches!(err, SettingsError::InvalidJson(_)));
    }
}
