//! Prompt assembler.

use crate::model::prompt::PromptTemplate;
use serde::{Deserialize, Serialize};

/// Phrase separating the instruction from the target extract.
pub const TARGET_FRAMING: &str = "Target text:";

/// Directive appended when multi-card JSON output is requested.
pub const STRUCTURED_OUTPUT_DIRECTIVE: &str = "Respond with a single JSON object and nothing else, \
shaped exactly as {\"cardCount\": <number of cards>, \
\"cards\": [{\"title\": \"<short title>\", \"body\": \"<explanation>\"}]}. \
Do not wrap it in Markdown and do not add any text before or after it.";

/// Output shape requested from the AI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One opaque text answer.
    PlainText,
    /// JSON object with an ordered card list.
    #[default]
    StructuredCards,
}

/// Builds the literal prompt text for one request.
///
/// Layout: instruction, optional format directive, framing phrase, target.
pub fn assemble_prompt(
    template: &PromptTemplate,
    target_text: &str,
    format: OutputFormat,
) -> String {
    let instruction = template.instruction_text.trim();
    let mut prompt = String::with_capacity(
        instruction.len() + target_text.len() + STRUCTURED_OUTPUT_DIRECTIVE.len() + 32,
    );
    prompt.push_str(instruction);
    prompt.push_str("\n\n");
    if format == OutputFormat::StructuredCards {
        prompt.push_str(STRUCTURED_OUTPUT_DIRECTIVE);
        prompt.push_str("\n\n");
    }
    prompt.push_str(TARGET_FRAMING);
    prompt.push('\n');
    prompt.push_str(target_text);
    prompt
}
