//! Message API handlers: the ask endpoint and conversation history

use axum::{
    extract::{Path, State},
    Json,
};
use parley_common::{Error, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ConversationsState;
use crate::domain::entities::{Message, MessageRole};

/// Request for asking a question
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    #[validate(length(min = 1, max = 10000))]
    pub question: String,

    #[serde(alias = "conversation_id")]
    pub conversation_id: i64,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Message as shown to the chat client
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub text: String,
    pub sender: MessageRole,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            text: m.content,
            sender: m.role,
        }
    }
}

/// Ask a question within a conversation
///
/// Always answers 200 once the question is stored; provider trouble shows
/// up only as a fallback answer.
pub async fn ask(
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<AskRequest>,
) -> Result<Json<AskResponse>> {
    let outcome = state
        .ask_flow()
        .run(req.conversation_id, req.question)
        .await?;

    Ok(Json(AskResponse {
        answer: outcome.answer,
    }))
}

/// List messages for a conversation, oldest first
pub async fn list_messages(
    State(state): State<ConversationsState>,
    Path(conversation_id): Path<i64>,
) -> Result<Json<Vec<MessageResponse>>> {
    let mut session = state.store.session().await?;

    if !session.conversation_exists(conversation_id).await? {
        return Err(Error::NotFound(format!(
            "Conversation {} not found",
            conversation_id
        )));
    }

    let messages = session.list_messages(conversation_id).await?;

    let responses: Vec<MessageResponse> = messages.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}
