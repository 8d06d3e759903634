//! Error types for DocRoute Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not supported yet: {0}")]
    NotSupported(String),

    #[error("Internal error: {0}")]
    Internal(String),

    // Content tree errors
    #[error("Content repository error: {0}")]
    Repository(String),

    #[error("Corrupt content tree: {0}")]
    CorruptTree(String),

    #[error("Domain lookup error: {0}")]
    DomainLookup(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration not found")]
    ConfigNotFound,

    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    // URL store errors
    #[error("URL store error: {0}")]
    Store(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
