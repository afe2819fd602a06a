//! Authorization server endpoints and Gmail scopes.

use crate::error::Result;
use url::Url;

/// Scope for sending mail through the Gmail REST API.
pub const SCOPE_GMAIL_SEND: &str = "https://www.googleapis.com/auth/gmail.send";

/// Scope for full Gmail access. Google only honors XOAUTH2 logins on
/// the raw IMAP and SMTP protocols under this scope.
pub const SCOPE_MAIL_FULL: &str = "https://mail.google.com/";

const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Endpoints and default scopes of one `OAuth2` authorization server.
#[derive(Debug, Clone)]
pub struct Provider {
    /// Name used in log output.
    pub name: String,
    /// Authorization endpoint the browser is sent to.
    pub auth_url: Url,
    /// Token endpoint for code exchange and refresh.
    pub token_url: Url,
    /// Scopes requested when the caller supplies none.
    pub default_scopes: Vec<String>,
}

impl Provider {
    /// Creates a provider from its endpoint URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is not a valid URL.
    pub fn new(
        name: impl Into<String>,
        auth_url: impl AsRef<str>,
        token_url: impl AsRef<str>,
        default_scopes: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            auth_url: Url::parse(auth_url.as_ref())?,
            token_url: Url::parse(token_url.as_ref())?,
            default_scopes,
        })
    }

    /// Google's endpoints, with [`SCOPE_GMAIL_SEND`] as the default
    /// scope. Callers going through IMAP or SMTP request
    /// [`SCOPE_MAIL_FULL`] explicitly instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint constants fail to parse.
    pub fn google() -> Result<Self> {
        Self::new(
            "Google",
            GOOGLE_AUTH_ENDPOINT,
            GOOGLE_TOKEN_ENDPOINT,
            vec![SCOPE_GMAIL_SEND.to_string()],
        )
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_google_provider() {
        let provider = Provider::google().unwrap();
        assert_eq!(provider.name, "Google");
        assert_eq!(provider.auth_url.host_str(), Some("accounts.google.com"));
        assert_eq!(provider.token_url.host_str(), Some("oauth2.googleapis.com"));
        assert_eq!(provider.default_scopes, vec![SCOPE_GMAIL_SEND.to_string()]);
    }

    #[test]
    fn test_custom_endpoints() {
        let provider = Provider::new(
            "Stub",
            "http://127.0.0.1:9999/auth",
            "http://127.0.0.1:9999/token",
            vec![SCOPE_MAIL_FULL.to_string()],
        )
        .unwrap();

        assert_eq!(provider.name, "Stub");
        assert_eq!(provider.auth_url.as_str(), "http://127.0.0.1:9999/auth");
        assert_eq!(provider.default_scopes, vec![SCOPE_MAIL_FULL.to_string()]);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = Provider::new(
            "Broken",
            "not a url",
            "https://auth.example.com/token",
            Vec::new(),
        );
        assert!(result.is_err());
    }
}
