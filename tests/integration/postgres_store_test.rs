//! Postgres-backed store tests
//!
//! These need a reachable database (TEST_DATABASE_URL or DATABASE_URL) and
//! are ignored by default. Run with `cargo test -- --ignored`.
//! Tests share one database, so assertions only look at rows they created.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use parley_conversations::{
    ConversationStore, MessageRole, NewConversation, NewMessage, PgConversationStore,
};
use parley_llm::MockLlmService;
use serde_json::json;
use tower::ServiceExt;

use crate::common::{json_request, parse_body, test_config, test_database_url};

/// Connect to the test database and apply migrations
async fn store() -> anyhow::Result<PgConversationStore> {
    let store = PgConversationStore::connect(&test_database_url(), 2).await?;
    store.migrate().await?;
    Ok(store)
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn test_messages_are_returned_in_insertion_order() {
    let store = store().await.unwrap();
    let mut session = store.session().await.unwrap();

    let conversation = session
        .create_conversation(&NewConversation::new(Some("Ordering".to_string())).unwrap())
        .await
        .unwrap();

    for (i, role) in [MessageRole::User, MessageRole::Assistant, MessageRole::User]
        .into_iter()
        .enumerate()
    {
        let draft = match role {
            MessageRole::User => NewMessage::user(conversation.id, format!("m{}", i)),
            MessageRole::Assistant => NewMessage::assistant(conversation.id, format!("m{}", i)),
        }
        .unwrap();
        session.insert_message(&draft).await.unwrap();
    }

    let messages = session.list_messages(conversation.id).await.unwrap();
    let texts: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(texts, vec!["m0", "m1", "m2"]);
    assert!(messages.windows(2).all(|w| w[0].created_at <= w[1].created_at));
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn test_insert_into_missing_conversation_is_not_found() {
    let store = store().await.unwrap();
    let mut session = store.session().await.unwrap();

    let err = session
        .insert_message(&NewMessage::user(i64::MAX, "orphan".to_string()).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, parley_common::Error::NotFound(_)));
    assert!(!session.conversation_exists(i64::MAX).await.unwrap());
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn test_chat_round_trip_over_postgres() {
    let store = store().await.unwrap();
    let app = parley_app::create_app(
        &test_config(),
        Arc::new(store.clone()),
        Arc::new(MockLlmService::replying("Hello!")),
    );

    let resp = app
        .clone()
        .oneshot(json_request(Method::POST, "/newConversation", Some(json!({}))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = parse_body(resp).await["conversationId"].as_i64().unwrap();

    let resp = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/ask",
            Some(json!({"question": "Hi", "conversationId": id})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(parse_body(resp).await, json!({"answer": "Hello!"}));

    let resp = app
        .clone()
        .oneshot(json_request(Method::GET, &format!("/conversations/{}", id), None))
        .await
        .unwrap();
    assert_eq!(
        parse_body(resp).await,
        json!([
            {"text": "Hi", "sender": "user"},
            {"text": "Hello!", "sender": "assistant"}
        ])
    );

    let resp = app
        .oneshot(json_request(Method::GET, "/conversations", None))
        .await
        .unwrap();
    let listed = parse_body(resp).await;
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["id"] == json!(id) && c["title"].is_null()));
}
