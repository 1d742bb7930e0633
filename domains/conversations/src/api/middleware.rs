//! Conversations domain state

use std::sync::Arc;

use crate::domain::answer::FallbackAnswers;
use crate::domain::ask::AskFlow;
use crate::domain::completion::CompletionClient;
use crate::repository::ConversationStore;

/// Application state for the Conversations domain
///
/// Built once at startup and cloned into each request.
#[derive(Clone)]
pub struct ConversationsState {
    pub store: Arc<dyn ConversationStore>,
    pub completion: CompletionClient,
    pub fallbacks: FallbackAnswers,
}

impl ConversationsState {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        completion: CompletionClient,
        fallbacks: FallbackAnswers,
    ) -> Self {
        Self {
            store,
            completion,
            fallbacks,
        }
    }

    /// Ask flow bound to this state's collaborators
    pub fn ask_flow(&self) -> AskFlow<'_> {
        AskFlow::new(self.store.as_ref(), &self.completion, &self.fallbacks)
    }
}
