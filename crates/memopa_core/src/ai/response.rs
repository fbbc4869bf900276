//! Structured card response parsing.
//!
//! # Responsibility
//! - Turn raw model output into an ordered card list.
//!
//! # Invariants
//! - Any output that is not the expected JSON object maps to
//!   `AiError::MalformedResponse` carrying the untouched raw text.
//! - Card order from the response is preserved.

use crate::ai::error::{AiError, AiResult};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*(.*?)\s*```$").expect("valid code fence regex")
});

/// One card returned by the AI collaborator, before it gets a segment id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub title: String,
    pub body: String,
}

impl CardDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CardResponse {
    #[serde(rename = "cardCount", alias = "card_count", default)]
    card_count: Option<u32>,
    cards: Vec<CardPayload>,
}

#[derive(Debug, Deserialize)]
struct CardPayload {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

/// Parses `{cardCount, cards: [{title, body}]}`, optionally fenced as Markdown.
///
/// A `cardCount` that disagrees with the card list is tolerated; the list wins.
pub fn parse_card_response(raw: &str) -> AiResult<Vec<CardDraft>> {
    let trimmed = raw.trim();
    let payload = CODE_FENCE_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |inner| inner.as_str());

    let parsed: CardResponse = serde_json::from_str(payload)
        .map_err(|_| AiError::MalformedResponse(raw.to_string()))?;

    if let Some(declared) = parsed.card_count {
        if usize::try_from(declared).ok() != Some(parsed.cards.len()) {
            debug!(
                "event=ai_response_parse module=ai status=count_mismatch declared={} actual={}",
                declared,
                parsed.cards.len()
            );
        }
    }

    Ok(parsed
        .cards
        .into_iter()
        .map(|card| CardDraft::new(card.title.trim(), card.body.trim()))
        .collect())
}
