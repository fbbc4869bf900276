//! Supported generative model catalog.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Generative model ids the app offers in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GenerativeModel {
    FlashLatest,
    Flash25,
    Flash20,
    ProLatest,
    Pro25,
}

/// Model id used when settings do not name one.
pub const DEFAULT_MODEL_ID: &str = MODEL_FLASH_LATEST;

pub const MODEL_FLASH_LATEST: &str = "gemini-flash-latest";
pub const MODEL_FLASH_2_5: &str = "gemini-2.5-flash";
pub const MODEL_FLASH_2_0: &str = "gemini-2.0-flash";
pub const MODEL_PRO_LATEST: &str = "gemini-pro-latest";
pub const MODEL_PRO_2_5: &str = "gemini-2.5-pro";

const SUPPORTED_MODEL_IDS: &[&str] = &[
    MODEL_FLASH_LATEST,
    MODEL_FLASH_2_5,
    MODEL_FLASH_2_0,
    MODEL_PRO_LATEST,
    MODEL_PRO_2_5,
];

impl GenerativeModel {
    /// Stable id sent to the generative endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FlashLatest => MODEL_FLASH_LATEST,
            Self::Flash25 => MODEL_FLASH_2_5,
            Self::Flash20 => MODEL_FLASH_2_0,
            Self::ProLatest => MODEL_PRO_LATEST,
            Self::Pro25 => MODEL_PRO_2_5,
        }
    }

    /// User-facing label for settings pickers.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::FlashLatest => "Gemini Flash (Latest)",
            Self::Flash25 => "Gemini 2.5 Flash",
            Self::Flash20 => "Gemini 2.0 Flash",
            Self::ProLatest => "Gemini Pro (Latest)",
            Self::Pro25 => "Gemini 2.5 Pro",
        }
    }
}

/// Returns supported model id strings in picker order.
pub fn supported_model_ids() -> &'static [&'static str] {
    SUPPORTED_MODEL_IDS
}

/// Parses one model id from settings.
pub fn parse_model(value: &str) -> Result<GenerativeModel, ModelError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(ModelError::EmptyModel);
    }

    match normalized {
        MODEL_FLASH_LATEST => Ok(GenerativeModel::FlashLatest),
        MODEL_FLASH_2_5 => Ok(GenerativeModel::Flash25),
        MODEL_FLASH_2_0 => Ok(GenerativeModel::Flash20),
        MODEL_PRO_LATEST => Ok(GenerativeModel::ProLatest),
        MODEL_PRO_2_5 => Ok(GenerativeModel::Pro25),
        other => Err(ModelError::UnsupportedModel(other.to_string())),
    }
}

/// Model id parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    EmptyModel,
    UnsupportedModel(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyModel => write!(f, "model id must not be empty"),
            Self::UnsupportedModel(value) => write!(f, "model id is unsupported: {value}"),
        }
    }
}

impl Error for ModelError {}
