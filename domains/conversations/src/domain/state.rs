//! Stages of a single ask request
//!
//! Received → UserMessagePersisted → AnswerObtained → AssistantMessagePersisted → Completed

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AskStage {
    Received,
    UserMessagePersisted,
    AnswerObtained,
    AssistantMessagePersisted,
    Completed,
}

impl AskStage {
    /// The stage that follows this one; `Completed` is terminal
    pub fn next(self) -> Option<AskStage> {
        match self {
            Self::Received => Some(Self::UserMessagePersisted),
            Self::UserMessagePersisted => Some(Self::AnswerObtained),
            Self::AnswerObtained => Some(Self::AssistantMessagePersisted),
            Self::AssistantMessagePersisted => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Advance in place; a no-op once terminal
    pub fn advance(&mut self) {
        if let Some(next) = self.next() {
            *self = next;
        }
    }
}

impl std::fmt::Display for AskStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Received => write!(f, "received"),
            Self::UserMessagePersisted => write!(f, "user_message_persisted"),
            Self::AnswerObtained => write!(f, "answer_obtained"),
            Self::AssistantMessagePersisted => write!(f, "assistant_message_persisted"),
            Self::Completed => write!(f, "completed"),
        }
    }
}
