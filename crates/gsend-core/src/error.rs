//! Error types for the orchestration layer.

use thiserror::Error;

/// Errors that can occur while authorizing or sending.
#[derive(Debug, Error)]
pub enum Error {
    /// `OAuth2` flow failed.
    #[error("OAuth error: {0}")]
    OAuth(#[from] gsend_oauth::Error),

    /// Message construction failed.
    #[error("Message error: {0}")]
    Message(#[from] gsend_mime::Error),

    /// Delivery failed.
    #[error("Transport error: {0}")]
    Transport(#[from] gsend_transport::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
