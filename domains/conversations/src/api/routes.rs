//! Route definitions for Conversations domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{conversations, messages};
use super::middleware::ConversationsState;

/// Create conversation routes
fn conversation_routes() -> Router<ConversationsState> {
    Router::new()
        .route(
            "/newConversation",
            post(conversations::create_conversation),
        )
        .route("/conversations", get(conversations::list_conversations))
}

/// Create message routes
fn message_routes() -> Router<ConversationsState> {
    Router::new()
        .route("/conversations/{id}", get(messages::list_messages))
        .route("/ask", post(messages::ask))
}

/// Create all Conversations domain API routes
pub fn routes() -> Router<ConversationsState> {
    Router::new()
        .merge(conversation_routes())
        .merge(message_routes())
}
