//! Parley application composition root
//!
//! Wires the conversation store and the completion provider into the
//! Conversations domain router, and owns the HTTP layers shared by the
//! local and Lambda entrypoints.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use parley_common::{Config, CorsOrigins};
use parley_conversations::{
    CompletionClient, ConversationStore, ConversationsState, FallbackAnswers, PgConversationStore,
};
use parley_llm::{LlmConfig, LlmService, LlmServiceFactory};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// Connect the production collaborators and build the router
///
/// Opens the Postgres pool, applies pending migrations, and instantiates the
/// configured completion provider.
pub async fn bootstrap(config: &Config) -> Result<Router, anyhow::Error> {
    let store =
        PgConversationStore::connect(&config.database_url, config.database_max_connections)
            .await
            .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;

    tracing::info!(
        max_connections = config.database_max_connections,
        "Database connection established"
    );

    store
        .migrate()
        .await
        .map_err(|e| anyhow::anyhow!("Database migration failed: {}", e))?;

    tracing::info!("Database migrations applied");

    let llm = LlmServiceFactory::create(LlmConfig::from_settings(&config.llm))
        .map_err(|e| anyhow::anyhow!("Completion provider setup failed: {}", e))?;

    tracing::info!(
        provider = %config.llm.provider,
        model = %llm.default_model(),
        "Completion provider ready"
    );

    Ok(create_app(config, Arc::new(store), Arc::from(llm)))
}

/// Create the main application router with all routes
pub fn create_app(
    config: &Config,
    store: Arc<dyn ConversationStore>,
    llm: Arc<dyn LlmService>,
) -> Router {
    let completion = CompletionClient::new(llm).with_system_prompt(config.llm.system_prompt.clone());
    let fallbacks = FallbackAnswers::new(
        config.fallback_empty_answer.clone(),
        config.fallback_error_answer.clone(),
    );

    let conversations_state = ConversationsState::new(store, completion, fallbacks);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Parley API v0.0.1-SNAPSHOT" }),
        )
        .merge(parley_conversations::routes().with_state(conversations_state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// CORS layer for the configured origins
///
/// Origins that are not valid header values are skipped with a warning.
pub fn build_cors_layer(origins: &CorsOrigins) -> CorsLayer {
    match origins {
        CorsOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsOrigins::List(list) => {
            let allowed: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        }
    }
}

pub fn body_limit_layer() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_BODY_BYTES)
}
