//! Completion Client: asks the hosted model a single question

use std::sync::Arc;

use parley_llm::{CompletionRequest, LlmMessage, LlmService};

use super::answer::CompletionOutcome;

/// Boundary over the configured `LlmService`
///
/// Provider errors never escape `ask`; they come back as
/// `CompletionOutcome::Failure` and are logged here.
#[derive(Clone)]
pub struct CompletionClient {
    llm: Arc<dyn LlmService>,
    system_prompt: Option<String>,
}

impl CompletionClient {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self {
            llm,
            system_prompt: None,
        }
    }

    /// Send a system prompt with every question
    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    /// Ask one question, single request/response
    pub async fn ask(&self, question: &str) -> CompletionOutcome {
        let request = CompletionRequest {
            model: String::new(),
            system_prompt: self.system_prompt.clone(),
            messages: vec![LlmMessage::user(question)],
            max_tokens: None,
        };

        match self.llm.complete(request).await {
            Ok(response) => {
                tracing::debug!(
                    model = %response.model,
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    stop_reason = %response.stop_reason,
                    "Completion received"
                );
                let outcome = CompletionOutcome::from_text(response.content);
                if outcome == CompletionOutcome::Empty {
                    tracing::warn!(model = %response.model, "Completion returned no text");
                }
                outcome
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    model = %self.llm.default_model(),
                    "Completion failed, substituting fallback answer"
                );
                CompletionOutcome::Failure(e.to_string())
            }
        }
    }
}
