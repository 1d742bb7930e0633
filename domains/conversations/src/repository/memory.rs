//! In-memory store for tests
//!
//! Mirrors the PostgreSQL store's observable behavior (generated ids,
//! foreign-key check on insert, ordering) and counts sessions so tests can
//! check that each one is released exactly once.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parley_common::{RepositoryError, Result};

use super::{ConversationStore, StoreSession};
use crate::domain::entities::{Conversation, Message, MessageRole, NewConversation, NewMessage};

#[derive(Default)]
struct MemoryState {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    last_stamp: Option<DateTime<Utc>>,
    acquired: usize,
    released: usize,
    unavailable: bool,
    failing_role: Option<MessageRole>,
}

impl MemoryState {
    /// Strictly increasing insertion timestamp
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

/// Shared in-memory store; clones see the same data
#[derive(Clone, Default)]
pub struct InMemoryConversationStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make `session()` fail as if the database were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Make inserts of the given role fail with a connection error
    pub fn fail_inserts_for(&self, role: Option<MessageRole>) {
        self.lock().failing_role = role;
    }

    /// Every stored message, in insertion order
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn sessions_acquired(&self) -> usize {
        self.lock().acquired
    }

    pub fn sessions_released(&self) -> usize {
        self.lock().released
    }

    /// Sessions currently held
    pub fn open_sessions(&self) -> usize {
        let state = self.lock();
        state.acquired - state.released
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn session(&self) -> Result<Box<dyn StoreSession>> {
        let mut state = self.lock();
        if state.unavailable {
            return Err(RepositoryError::Connection(sqlx::Error::PoolTimedOut).into());
        }
        state.acquired += 1;
        Ok(Box::new(MemorySession {
            store: self.clone(),
        }))
    }
}

struct MemorySession {
    store: InMemoryConversationStore,
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.store.lock().released += 1;
    }
}

#[async_trait]
impl StoreSession for MemorySession {
    async fn create_conversation(&mut self, new: &NewConversation) -> Result<Conversation> {
        let mut state = self.store.lock();
        let conv = Conversation {
            id: state.conversations.len() as i64 + 1,
            title: new.title.clone(),
            created_at: state.stamp(),
        };
        state.conversations.push(conv.clone());
        Ok(conv)
    }

    async fn list_conversations(&mut self) -> Result<Vec<Conversation>> {
        Ok(self.store.lock().conversations.clone())
    }

    async fn conversation_exists(&mut self, id: i64) -> Result<bool> {
        Ok(self.store.lock().conversations.iter().any(|c| c.id == id))
    }

    async fn list_messages(&mut self, conversation_id: i64) -> Result<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .store
            .lock()
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| (m.created_at, m.id));
        Ok(messages)
    }

    async fn insert_message(&mut self, new: &NewMessage) -> Result<Message> {
        let mut state = self.store.lock();
        if state.failing_role == Some(new.role) {
            return Err(RepositoryError::Connection(sqlx::Error::PoolClosed).into());
        }
        if !state.conversations.iter().any(|c| c.id == new.conversation_id) {
            return Err(RepositoryError::NotFound.into());
        }
        let msg = Message {
            id: state.messages.len() as i64 + 1,
            conversation_id: new.conversation_id,
            role: new.role,
            content: new.content.clone(),
            created_at: state.stamp(),
        };
        state.messages.push(msg.clone());
        Ok(msg)
    }
}
