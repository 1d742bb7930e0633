//! Message queries, run on a caller-held connection

use crate::domain::entities::{Message, NewMessage};
use parley_common::{RepositoryError, Result};
use sqlx::PgConnection;

/// List messages for a conversation in creation order
///
/// `id` breaks ties between rows stamped with the same `created_at`.
pub async fn list_messages(conn: &mut PgConnection, conversation_id: i64) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, conversation_id, role, content, created_at
        FROM messages
        WHERE conversation_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(conn)
    .await?;

    Ok(messages)
}

/// Insert a message and return the stored row
///
/// A dangling `conversation_id` surfaces as `NotFound` via the foreign key.
pub async fn insert_message(conn: &mut PgConnection, new: &NewMessage) -> Result<Message> {
    let created = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (conversation_id, role, content)
        VALUES ($1, $2, $3)
        RETURNING id, conversation_id, role, content, created_at
        "#,
    )
    .bind(new.conversation_id)
    .bind(new.role)
    .bind(&new.content)
    .fetch_one(conn)
    .await
    .map_err(classify_insert_error)?;

    Ok(created)
}

fn classify_insert_error(err: sqlx::Error) -> RepositoryError {
    let dangling = err
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation());

    if dangling {
        RepositoryError::NotFound
    } else {
        RepositoryError::Connection(err)
    }
}
