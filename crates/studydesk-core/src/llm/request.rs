//! Provider-independent request shape

use crate::session::Role;
use serde::{Deserialize, Serialize};

/// Fixed instruction sent with every request
pub const SYSTEM_INSTRUCTION: &str = "You are a patient and rigorous study tutor. \
Answer in the language of the question. Structure answers with short paragraphs. \
Write every mathematical formula in LaTeX enclosed in double dollars, for example $$\\frac{a}{b}$$, \
and never use single dollars.";

/// One earlier turn forwarded as conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Everything a provider needs to produce one answer
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    /// Raw or retrieved document text, may be empty
    pub context: String,
    pub history: Vec<ChatTurn>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Final user message, with the context block prepended when present
    pub fn user_message(&self) -> String {
        if self.context.trim().is_empty() {
            self.prompt.clone()
        } else {
            format!(
                "Course material:\n\"\"\"\n{}\n\"\"\"\n\nQuestion: {}",
                self.context.trim(),
                self.prompt
            )
        }
    }
}
