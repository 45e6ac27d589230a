//! Error types for memoir-rag
//!
//! This module provides comprehensive error handling for all memoir operations,
//! including chapter processing, storage, search, and the external model APIs.

use thiserror::Error;

/// Main error type for memoir operations
#[derive(Error, Debug)]
pub enum MemoirError {
    /// Text/chapter processing errors
    #[error("Text processing error: {0}")]
    TextProcessing(String),

    /// Chat-completion API errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Full-text search errors
    #[error("Search error: {0}")]
    Search(String),

    /// Database/storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Image generation errors
    #[error("Image generation error: {0}")]
    ImageGeneration(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// OpenAI-compatible API errors
    #[error("Chat completion error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(String),
}

/// Result type alias for memoir operations
pub type Result<T> = std::result::Result<T, MemoirError>;

impl From<anyhow::Error> for MemoirError {
    fn from(err: anyhow::Error) -> Self {
        MemoirError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MemoirError::TextProcessing("test error".to_string());
        assert_eq!(error.to_string(), "Text processing error: test error");
    }

    #[test]
    fn test_error_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let memoir_error = MemoirError::from(io_error);

        match memoir_error {
            MemoirError::Io(_) => (),
            _ => panic!("Expected Io error"),
        }
    }
}
