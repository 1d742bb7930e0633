//! Persistence gateway for the Conversations domain
//!
//! A `ConversationStore` hands out `StoreSession`s. A session owns one
//! connection for its whole lifetime and gives it back when dropped, so every
//! exit path of a request releases exactly what it acquired.

pub mod conversations;
pub mod messages;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

use async_trait::async_trait;
use parley_common::Result;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};

use crate::domain::entities::{Conversation, Message, NewConversation, NewMessage};

#[cfg(any(test, feature = "test-support"))]
pub use memory::InMemoryConversationStore;

/// Source of scoped store sessions
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Acquire a session; released when the returned value is dropped
    async fn session(&self) -> Result<Box<dyn StoreSession>>;
}

/// Operations available on an acquired connection
#[async_trait]
pub trait StoreSession: Send {
    async fn create_conversation(&mut self, new: &NewConversation) -> Result<Conversation>;

    /// All conversations, no pagination
    async fn list_conversations(&mut self) -> Result<Vec<Conversation>>;

    async fn conversation_exists(&mut self, id: i64) -> Result<bool>;

    /// Messages of one conversation ordered by `created_at` ascending
    async fn list_messages(&mut self, conversation_id: i64) -> Result<Vec<Message>>;

    async fn insert_message(&mut self, new: &NewMessage) -> Result<Message>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool of at most `max_connections`
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn session(&self) -> Result<Box<dyn StoreSession>> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgStoreSession { conn }))
    }
}

/// Session holding one pooled connection
struct PgStoreSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl StoreSession for PgStoreSession {
    async fn create_conversation(&mut self, new: &NewConversation) -> Result<Conversation> {
        conversations::create_conversation(&mut self.conn, new).await
    }

    async fn list_conversations(&mut self) -> Result<Vec<Conversation>> {
        conversations::list_conversations(&mut self.conn).await
    }

    async fn conversation_exists(&mut self, id: i64) -> Result<bool> {
        conversations::conversation_exists(&mut self.conn, id).await
    }

    async fn list_messages(&mut self, conversation_id: i64) -> Result<Vec<Message>> {
        messages::list_messages(&mut self.conn, conversation_id).await
    }

    async fn insert_message(&mut self, new: &NewMessage) -> Result<Message> {
        messages::insert_message(&mut self.conn, new).await
    }
}
