//! Bearer tokens and their expiry bookkeeping.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Seconds subtracted from the reported expiry, absorbing clock skew
/// and the latency of the request the token is about to be used in.
const EXPIRY_SKEW_SECS: i64 = 60;

/// A bearer token together with its refresh material.
///
/// Also the on-disk shape of the token cache file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Bearer string presented to Gmail.
    pub access_token: String,
    /// Token type reported by the server, `Bearer` in practice.
    pub token_type: String,
    /// Instant the access token stops working, when the server said.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Long-lived token used to mint fresh access tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Scopes the server actually granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Token {
    /// Creates a bare token with no expiry or refresh material.
    #[must_use]
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_at: None,
            refresh_token: None,
            scope: None,
        }
    }

    /// Attaches a refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Attaches an expiry instant.
    #[must_use]
    pub const fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the access token is too close to its expiry to use.
    ///
    /// Anything within 60 seconds of the reported expiry counts as
    /// expired. A token the server gave no expiry for never does.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let cutoff = Utc::now() + Duration::seconds(EXPIRY_SKEW_SECS);
        self.expires_at.is_some_and(|at| at <= cutoff)
    }

    /// Whether the access token can still be presented.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_expired()
    }

    /// Borrows the refresh token.
    ///
    /// # Errors
    ///
    /// Returns `NoRefreshToken` if the server never issued one.
    pub fn refresh_token(&self) -> Result<&str> {
        self.refresh_token.as_deref().ok_or(Error::NoRefreshToken)
    }
}

impl From<TokenResponse> for Token {
    /// Pins the expiry to an absolute instant at receipt time, since
    /// the server only reports the relative `expires_in`.
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_at: response
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(i64::from(secs))),
            refresh_token: response.refresh_token,
            scope: response.scope,
        }
    }
}

/// Success body of a token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Access token string.
    pub access_token: String,
    /// Token type, `Bearer` in practice.
    pub token_type: String,
    /// Lifetime of the access token in seconds.
    pub expires_in: Option<u32>,
    /// Refresh token, present on the initial grant.
    pub refresh_token: Option<String>,
    /// Scopes granted.
    pub scope: Option<String>,
}

/// Failure body of a token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Error code such as `invalid_grant`.
    pub error: String,
    /// Human-readable description, often omitted by the server.
    #[serde(default)]
    pub error_description: String,
}

impl From<ErrorResponse> for Error {
    fn from(response: ErrorResponse) -> Self {
        Self::OAuth {
            error: response.error,
            description: response.error_description,
        }
    }
}
