//! Error types for Gmail transport operations.

use std::io;

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gmail API rejected the request.
    #[error("Gmail API error ({status}): {body}")]
    Api {
        /// HTTP status returned.
        status: reqwest::StatusCode,
        /// Response body, usually a JSON error description.
        body: String,
    },

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),

    /// Envelope construction error.
    #[error("Envelope error: {0}")]
    Envelope(#[from] lettre::error::Error),

    /// SMTP session error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// IMAP session error.
    #[error("IMAP error: {0}")]
    Imap(#[from] async_imap::error::Error),

    /// Protocol error (unexpected response).
    #[error("Protocol error: {0}")]
    Protocol(String),
}
