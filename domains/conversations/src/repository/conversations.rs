//! Conversation queries, run on a caller-held connection

use crate::domain::entities::{Conversation, NewConversation};
use parley_common::Result;
use sqlx::PgConnection;

/// Insert a conversation and return the stored row
pub async fn create_conversation(
    conn: &mut PgConnection,
    new: &NewConversation,
) -> Result<Conversation> {
    let created = sqlx::query_as::<_, Conversation>(
        r#"
        INSERT INTO conversations (title)
        VALUES ($1)
        RETURNING id, title, created_at
        "#,
    )
    .bind(&new.title)
    .fetch_one(conn)
    .await?;

    Ok(created)
}

/// List all conversations, oldest first
pub async fn list_conversations(conn: &mut PgConnection) -> Result<Vec<Conversation>> {
    let convs = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, title, created_at
        FROM conversations
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(convs)
}

/// Check whether a conversation exists
pub async fn conversation_exists(conn: &mut PgConnection, id: i64) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM conversations WHERE id = $1)",
    )
    .bind(id)
    .fetch_one(conn)
    .await?;

    Ok(exists)
}
