//! Domain entities for the Conversations domain
//!
//! Conversations and messages are identified by store-generated integers.
//! Drafts (`NewConversation`, `NewMessage`) carry the validated input for an
//! insert; the stored row comes back from the store with its id and timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parley_common::{Error, Result};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// Maximum title string length (varchar(200))
const MAX_TITLE_LENGTH: usize = 200;

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: i64,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a conversation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewConversation {
    pub title: Option<String>,
}

impl NewConversation {
    /// Create a conversation draft
    ///
    /// A whitespace-only title is stored as no title.
    pub fn new(title: Option<String>) -> Result<Self> {
        let title = title.filter(|t| !t.trim().is_empty());

        if let Some(ref t) = title {
            if t.chars().count() > MAX_TITLE_LENGTH {
                return Err(Error::Validation(format!(
                    "Title must be at most {} characters",
                    MAX_TITLE_LENGTH
                )));
            }
        }

        Ok(Self { title })
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for inserting a message
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub conversation_id: i64,
    pub role: MessageRole,
    pub content: String,
}

impl NewMessage {
    /// Create a user message draft
    pub fn user(conversation_id: i64, content: String) -> Result<Self> {
        Self::new(conversation_id, MessageRole::User, content)
    }

    /// Create an assistant message draft
    pub fn assistant(conversation_id: i64, content: String) -> Result<Self> {
        Self::new(conversation_id, MessageRole::Assistant, content)
    }

    fn new(conversation_id: i64, role: MessageRole, content: String) -> Result<Self> {
        Self::validate_content(&content)?;

        Ok(Self {
            conversation_id,
            role,
            content,
        })
    }

    /// Validate message content (CHECK (length(trim(content)) > 0))
    fn validate_content(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(Error::Validation(
                "Message content cannot be empty or whitespace-only".to_string(),
            ));
        }
        Ok(())
    }
}
