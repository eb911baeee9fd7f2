//! Error types for the story store.

use thiserror::Error;

/// Result type alias for story store operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors that can occur during story store operations.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("failed to open story backend: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("story id generation failed: {0}")]
    Id(String),
}
