//! Conversation management API handlers

use axum::{extract::State, http::StatusCode, Json};
use parley_common::{Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ConversationsState;
use crate::domain::entities::{Conversation, NewConversation};

/// Request for creating a conversation
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateConversationRequest {
    /// Optional conversation title
    #[validate(length(max = 200))]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationResponse {
    pub conversation_id: i64,
}

/// Conversation list entry
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: i64,
    pub title: Option<String>,
}

impl From<Conversation> for ConversationResponse {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id,
            title: c.title,
        }
    }
}

/// Create a new conversation
///
/// The body is optional; a request without one creates an untitled
/// conversation.
pub async fn create_conversation(
    State(state): State<ConversationsState>,
    body: Option<ValidatedJson<CreateConversationRequest>>,
) -> Result<(StatusCode, Json<CreateConversationResponse>)> {
    let req = body.map(|ValidatedJson(req)| req).unwrap_or_default();
    let draft = NewConversation::new(req.title)?;

    let mut session = state.store.session().await?;
    let created = session.create_conversation(&draft).await?;

    tracing::info!(conversation_id = created.id, "Conversation created");

    Ok((
        StatusCode::CREATED,
        Json(CreateConversationResponse {
            conversation_id: created.id,
        }),
    ))
}

/// List all conversations
pub async fn list_conversations(
    State(state): State<ConversationsState>,
) -> Result<Json<Vec<ConversationResponse>>> {
    let mut session = state.store.session().await?;
    let convs = session.list_conversations().await?;

    let responses: Vec<ConversationResponse> = convs.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}
