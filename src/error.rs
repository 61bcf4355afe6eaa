//! Error types for role-scan.

use serde::Serialize;

/// Top-level error type for a scan invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Configuration and argument errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid message link: {link}")]
    InvalidMessageLink { link: String },

    #[error("Start message must be older than the end message")]
    StartNotBeforeEnd,
}

/// Message-source errors. Fatal: a scan that cannot read its source
/// aborts before any report is built.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("channel or thread {target} is unavailable: {reason}")]
    Unavailable { target: String, reason: String },
}

/// Per-author role mutation failures. Recorded in the report; the scan
/// continues past every one of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignError {
    #[error("permission denied")]
    Forbidden,

    #[error("rate limited")]
    RateLimited,

    #[error("member not found (left server?)")]
    NotFound,

    #[error("{0}")]
    Unknown(String),
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
