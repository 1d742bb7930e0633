//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables once at process
//! start. A missing required value is a startup error, never a per-request one.

use anyhow::Result;
use std::env;
use std::fmt;

/// Fallback used when the provider answers with no text
pub const DEFAULT_EMPTY_ANSWER: &str = "I'm sorry, I couldn't generate a response.";

/// Fallback used when the provider call fails
pub const DEFAULT_ERROR_ANSWER: &str =
    "Sorry, there was an issue generating a response. Please try again later.";

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Allowed cross-origin callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin, method and header (development posture)
    Any,
    /// Explicit list of origins
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma-separated origin list; `*` or an empty value means any
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

/// Language-model provider settings
#[derive(Clone)]
pub struct LlmSettings {
    /// Provider name (anthropic, openai, mock)
    pub provider: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub system_prompt: Option<String>,
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,
    pub database_max_connections: u32,

    /// Completion provider
    pub llm: LlmSettings,

    /// Assistant replies substituted when generation yields nothing
    pub fallback_empty_answer: String,
    pub fallback_error_answer: String,

    /// Runtime configuration
    pub cors_origins: CorsOrigins,
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required"))?;

        let provider = get("LLM_PROVIDER")
            .map(|p| p.trim().to_lowercase())
            .unwrap_or_else(|| "anthropic".to_string());

        let provider_key_var = match provider.as_str() {
            "openai" => Some("OPENAI_API_KEY"),
            "anthropic" | "claude" => Some("ANTHROPIC_API_KEY"),
            _ => None,
        };
        let api_key = get("LLM_API_KEY").or_else(|| provider_key_var.and_then(|var| get(var)));

        if provider != "mock" && api_key.is_none() {
            return Err(anyhow::anyhow!(
                "LLM_API_KEY is required for provider '{}'",
                provider
            ));
        }

        let llm = LlmSettings {
            provider,
            api_key,
            model: get("LLM_MODEL"),
            base_url: get("LLM_BASE_URL"),
            max_tokens: parse_or(get("LLM_MAX_TOKENS"), DEFAULT_MAX_TOKENS),
            timeout_secs: parse_or(get("LLM_TIMEOUT_SECS"), DEFAULT_LLM_TIMEOUT_SECS),
            system_prompt: get("LLM_SYSTEM_PROMPT"),
        };

        let database_max_connections =
            parse_or(get("DATABASE_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS);
        if database_max_connections == 0 {
            return Err(anyhow::anyhow!(
                "DATABASE_MAX_CONNECTIONS must be at least 1"
            ));
        }

        let config = Self {
            database_url,
            database_max_connections,
            llm,
            fallback_empty_answer: get("FALLBACK_EMPTY_ANSWER")
                .unwrap_or_else(|| DEFAULT_EMPTY_ANSWER.to_string()),
            fallback_error_answer: get("FALLBACK_ERROR_ANSWER")
                .unwrap_or_else(|| DEFAULT_ERROR_ANSWER.to_string()),
            cors_origins: CorsOrigins::parse(&get("CORS_ALLOWED_ORIGINS").unwrap_or_default()),
            rust_log: get("RUST_LOG")
                .unwrap_or_else(|| "parley=info,tower_http=info".to_string()),
            port: parse_or(get("PORT"), DEFAULT_PORT),
        };

        Ok(config)
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
