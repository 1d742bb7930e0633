//! Shared utilities, configuration, and error handling for Parley
//!
//! This crate provides common functionality used across the Parley service:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Request extractors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::{Config, CorsOrigins, LlmSettings};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
