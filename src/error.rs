//! Error types for Rapport

use thiserror::Error;

/// Errors that can occur while normalizing or analyzing a conversation
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid conversation input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse chat export: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}
