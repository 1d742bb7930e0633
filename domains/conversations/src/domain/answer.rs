//! Completion outcomes and the fallback policy that turns them into reply text

use parley_common::config::{DEFAULT_EMPTY_ANSWER, DEFAULT_ERROR_ANSWER};

/// Result of asking the model a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The provider produced non-blank text
    Answer(String),
    /// The provider responded successfully but with no text
    Empty,
    /// The provider call failed; the reason is for logs only
    Failure(String),
}

impl CompletionOutcome {
    /// Classify provider text, treating blank text as `Empty`
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            CompletionOutcome::Empty
        } else {
            CompletionOutcome::Answer(text)
        }
    }
}

/// Fixed replies substituted when generation yields nothing usable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackAnswers {
    pub empty: String,
    pub failure: String,
}

impl FallbackAnswers {
    pub fn new(empty: impl Into<String>, failure: impl Into<String>) -> Self {
        Self {
            empty: empty.into(),
            failure: failure.into(),
        }
    }

    /// Produce the assistant reply for an outcome; never fails
    pub fn resolve(&self, outcome: CompletionOutcome) -> String {
        match outcome {
            CompletionOutcome::Answer(text) => text,
            CompletionOutcome::Empty => self.empty.clone(),
            CompletionOutcome::Failure(_) => self.failure.clone(),
        }
    }
}

impl Default for FallbackAnswers {
    fn default() -> Self {
        Self::new(DEFAULT_EMPTY_ANSWER, DEFAULT_ERROR_ANSWER)
    }
}
