//! Error types for tabview

use thiserror::Error;

/// Core error type for engine operations
#[derive(Error, Debug)]
pub enum TabviewError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Update error: {0}")]
    Update(String),

    #[error("Delete error: {0}")]
    Delete(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

impl TabviewError {
    /// The message the server (or transport) reported, without the category prefix.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Connection(msg)
            | Self::Query(msg)
            | Self::Update(msg)
            | Self::Delete(msg)
            | Self::Export(msg)
            | Self::Schema(msg)
            | Self::Configuration(msg)
            | Self::NotFound(msg)
            | Self::Other(msg) => {
                let msg = msg.trim();
                (!msg.is_empty()).then_some(msg)
            }
            Self::Serialization(_) => None,
        }
    }
}

/// Result type alias for tabview operations
pub type Result<T> = std::result::Result<T, TabviewError>;
