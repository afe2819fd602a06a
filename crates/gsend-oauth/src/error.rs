//! Error types for `OAuth2` operations.

use std::io;

/// Result type alias for `OAuth2` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between consent and a usable token.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O failure on the loopback socket.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP failure talking to the token endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed JSON from the token endpoint.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structured error body from the token endpoint.
    #[error("OAuth2 error: {error} - {description}")]
    OAuth {
        /// Error code (e.g., `invalid_grant`).
        error: String,
        /// Human-readable description.
        description: String,
    },

    /// Authorization server redirected back with an error.
    #[error("Authorization denied: {0}")]
    Denied(String),

    /// Redirect arrived without a code or error parameter.
    #[error("No authorization code in redirect")]
    NoAuthorizationCode,

    /// Refresh was requested but the server never issued a refresh token.
    #[error("No refresh token available")]
    NoRefreshToken,

    /// The redirect never arrived within the caller's deadline.
    #[error("Authorization timed out after {0} seconds")]
    Timeout(u64),

    /// Browser launch failure.
    #[error("Failed to open browser: {0}")]
    Browser(String),

    /// Endpoint URL failed to parse.
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}
