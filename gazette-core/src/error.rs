use thiserror::Error;

pub type Result<T> = std::result::Result<T, GazetteError>;

#[derive(Error, Debug)]
pub enum GazetteError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid date key: {0}")]
    InvalidDateKey(String),

    #[error("Invalid game state: {0}")]
    InvalidState(String),

    #[error("Content pool error: {0}")]
    Content(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GazetteError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
