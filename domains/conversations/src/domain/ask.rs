//! Ask flow: persist the question, obtain an answer, persist the answer
//!
//! Only store failures abort the flow. Completion failures are absorbed by the
//! fallback policy, so once the user message is stored the flow always writes
//! an assistant message too.

use parley_common::{Error, Result};

use super::answer::FallbackAnswers;
use super::completion::CompletionClient;
use super::entities::{Message, NewMessage};
use super::state::AskStage;
use crate::repository::ConversationStore;

/// Result of a completed ask
#[derive(Debug, Clone, PartialEq)]
pub struct AskOutcome {
    pub answer: String,
    pub user_message: Message,
    pub assistant_message: Message,
}

/// Collaborators of one ask request
pub struct AskFlow<'a> {
    store: &'a dyn ConversationStore,
    completion: &'a CompletionClient,
    fallbacks: &'a FallbackAnswers,
}

impl<'a> AskFlow<'a> {
    pub fn new(
        store: &'a dyn ConversationStore,
        completion: &'a CompletionClient,
        fallbacks: &'a FallbackAnswers,
    ) -> Self {
        Self {
            store,
            completion,
            fallbacks,
        }
    }

    /// Run the flow for one question
    ///
    /// The store session is acquired once, after input validation, and is
    /// dropped on every return path.
    pub async fn run(&self, conversation_id: i64, question: String) -> Result<AskOutcome> {
        let mut stage = AskStage::Received;
        let user_draft = NewMessage::user(conversation_id, question)?;

        let mut session = self.store.session().await?;

        if !session.conversation_exists(conversation_id).await? {
            return Err(Error::NotFound(format!(
                "Conversation {} not found",
                conversation_id
            )));
        }

        let user_message = session
            .insert_message(&user_draft)
            .await
            .inspect_err(|e| log_abort(stage, conversation_id, e))?;
        stage.advance();

        let outcome = self.completion.ask(&user_message.content).await;
        let answer = self.fallbacks.resolve(outcome);
        stage.advance();

        let assistant_draft = NewMessage::assistant(conversation_id, answer)?;
        let assistant_message = session
            .insert_message(&assistant_draft)
            .await
            .inspect_err(|e| log_abort(stage, conversation_id, e))?;
        stage.advance();

        drop(session);
        stage.advance();

        tracing::info!(
            conversation_id,
            user_message_id = user_message.id,
            assistant_message_id = assistant_message.id,
            stage = %stage,
            "Ask flow completed"
        );

        Ok(AskOutcome {
            answer: assistant_message.content.clone(),
            user_message,
            assistant_message,
        })
    }
}

#[mutants::skip] // Logging only
fn log_abort(stage: AskStage, conversation_id: i64, error: &Error) {
    tracing::error!(
        conversation_id,
        stage = %stage,
        error = %error,
        "Ask flow aborted by store failure"
    );
}
