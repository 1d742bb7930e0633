//! End-to-end ask flow against a local stand-in for the Anthropic API

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{Method, StatusCode},
    routing::post,
    Json, Router,
};
use parley_conversations::InMemoryConversationStore;
use parley_llm::{LlmConfig, LlmServiceFactory};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::common::{json_request, parse_body, test_config};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn app_against(base_url: String, store: &InMemoryConversationStore) -> Router {
    let mut config = test_config();
    config.llm.provider = "anthropic".to_string();
    config.llm.api_key = Some("sk-test".to_string());
    config.llm.base_url = Some(base_url);

    let mut llm_config = LlmConfig::from_settings(&config.llm);
    llm_config.timeout = Some(Duration::from_millis(300));
    let llm = LlmServiceFactory::create(llm_config).unwrap();

    parley_app::create_app(&config, Arc::new(store.clone()), Arc::from(llm))
}

async fn ask_once(app: Router) -> (StatusCode, Value) {
    app.clone()
        .oneshot(json_request(Method::POST, "/newConversation", Some(json!({}))))
        .await
        .unwrap();
    let resp = app
        .oneshot(json_request(
            Method::POST,
            "/ask",
            Some(json!({"question": "Hi", "conversationId": 1})),
        ))
        .await
        .unwrap();
    let status = resp.status();
    (status, parse_body(resp).await)
}

#[test_log::test(tokio::test)]
async fn test_provider_answer_is_stored() {
    let base_url = serve(Router::new().route(
        "/v1/messages",
        post(|| async {
            Json(json!({
                "content": [{"type": "text", "text": "Hello!"}],
                "model": "claude-sonnet-4-5-20250929",
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 3, "output_tokens": 2}
            }))
        }),
    ))
    .await;
    let store = InMemoryConversationStore::new();

    let (status, body) = ask_once(app_against(base_url, &store)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"answer": "Hello!"}));
    assert_eq!(store.messages()[1].content, "Hello!");
}

#[test_log::test(tokio::test)]
async fn test_slow_provider_times_out_to_error_fallback() {
    let base_url = serve(Router::new().route(
        "/v1/messages",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({}))
        }),
    ))
    .await;
    let store = InMemoryConversationStore::new();

    let (status, body) = ask_once(app_against(base_url, &store)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], parley_common::config::DEFAULT_ERROR_ANSWER);
    assert_eq!(store.messages().len(), 2);
    assert_eq!(store.open_sessions(), 0);
}

#[test_log::test(tokio::test)]
async fn test_provider_server_error_uses_error_fallback() {
    let base_url = serve(Router::new().route(
        "/v1/messages",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": {"type": "api_error", "message": "overloaded"}})),
            )
        }),
    ))
    .await;
    let store = InMemoryConversationStore::new();

    let (status, body) = ask_once(app_against(base_url, &store)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], parley_common::config::DEFAULT_ERROR_ANSWER);
}

#[test_log::test(tokio::test)]
async fn test_blank_provider_text_uses_empty_fallback() {
    let base_url = serve(Router::new().route(
        "/v1/messages",
        post(|| async {
            Json(json!({
                "content": [{"type": "text", "text": "  \n "}],
                "model": "claude-sonnet-4-5-20250929",
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 3, "output_tokens": 0}
            }))
        }),
    ))
    .await;
    let store = InMemoryConversationStore::new();

    let (status, body) = ask_once(app_against(base_url, &store)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], parley_common::config::DEFAULT_EMPTY_ANSWER);
}

#[test]
fn test_unknown_provider_is_rejected_at_startup() {
    let mut config = test_config();
    config.llm.provider = "carrier-pigeon".to_string();

    let result = LlmServiceFactory::create(LlmConfig::from_settings(&config.llm));

    assert!(result.is_err());
}
