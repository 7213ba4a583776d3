//! Error types for the context engine.

use thiserror::Error;

/// Context engine error type
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Store error: {0}")]
    Store(#[from] banter_store::StoreError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for context operations
pub type ContextResult<T> = Result<T, ContextError>;
