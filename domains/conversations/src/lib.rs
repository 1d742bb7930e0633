//! Conversations domain: chat threads, messages, and the ask flow

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::answer::{CompletionOutcome, FallbackAnswers};
pub use domain::ask::{AskFlow, AskOutcome};
pub use domain::completion::CompletionClient;
pub use domain::entities::{Conversation, Message, MessageRole, NewConversation, NewMessage};
pub use domain::state::AskStage;

// Re-export repository types
pub use repository::{ConversationStore, PgConversationStore, StoreSession};

#[cfg(any(test, feature = "test-support"))]
pub use repository::InMemoryConversationStore;

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
