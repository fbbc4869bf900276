//! Prompt template model.
//!
//! # Responsibility
//! - Describe one configurable explanation button.
//! - Provide the built-in default button set.
//!
//! # Invariants
//! - Default templates keep a stable order; the UI renders them left to right.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user-configurable explanation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub id: Uuid,
    /// Short button label.
    pub name: String,
    /// Instruction sent ahead of the target text.
    pub instruction_text: String,
    pub enabled: bool,
}

impl PromptTemplate {
    /// Creates an enabled template with a generated id.
    pub fn new(name: impl Into<String>, instruction_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            instruction_text: instruction_text.into(),
            enabled: true,
        }
    }
}

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (
        "What is it?",
        "Define the following term and explain it clearly for a beginner.",
    ),
    (
        "Casual",
        "Explain the following content in a relaxed tone using a familiar, everyday analogy.",
    ),
    (
        "Summary",
        "Summarize the following content so that its single most important point comes across.",
    ),
];

/// Returns the built-in template set used before the user customizes buttons.
pub fn default_prompt_templates() -> Vec<PromptTemplate> {
    DEFAULT_TEMPLATES
        .iter()
        .map(|(name, instruction)| PromptTemplate::new(*name, *instruction))
        .collect()
}

/// Filters enabled templates, preserving order.
pub fn enabled_templates(templates: &[PromptTemplate]) -> Vec<&PromptTemplate> {
    templates.iter().filter(|template| template.enabled).collect()
}
