//! Loopback redirect listener for the authorization code flow.
//!
//! The authorization server redirects the user's browser back to a local
//! HTTP endpoint. This module binds that endpoint, serves exactly one
//! request, answers it with a static confirmation page, and hands the
//! parsed `code`/`error` parameters back to the caller.

use crate::browser::{BrowserLauncher, SystemBrowser};
use crate::error::{Error, Result};
use percent_encoding::percent_decode_str;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Default port for the loopback redirect endpoint.
pub const DEFAULT_PORT: u16 = 8080;

/// Confirmation page served to the browser after the redirect.
const CONFIRMATION_HTML: &str = "<html><head><title>Authentication Complete</title></head>\
<body>Authentication complete. You can close this window now.</body></html>";

/// Outcome of a redirect callback capture.
///
/// After a successful capture exactly one of the two fields is populated;
/// both absent means the query carried no recognizable parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationResult {
    /// Authorization code, if the user granted consent.
    pub code: Option<String>,
    /// Error code from the authorization server, if consent failed.
    pub error: Option<String>,
}

impl AuthorizationResult {
    /// Unwraps the authorization code.
    ///
    /// # Errors
    ///
    /// Returns `Denied` if the server redirected with an error, or
    /// `NoAuthorizationCode` if the callback carried neither parameter.
    pub fn into_code(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(Error::Denied(error));
        }
        self.code.ok_or(Error::NoAuthorizationCode)
    }
}

/// Parses a redirect callback query string.
///
/// Pairs are split on `&`, keys and values on the first `=`. Values are
/// percent-decoded; `+` is left as-is. Keys `code` and `error` are
/// matched case-sensitively, everything else is ignored. In particular
/// a `state` parameter is never checked against the authorization
/// request, so the callback is trusted as-is.
#[must_use]
pub fn parse_callback_query(query: &str) -> AuthorizationResult {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut result = AuthorizationResult::default();

    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = percent_decode_str(value).decode_utf8_lossy().into_owned();

        match key {
            "code" => result.code = Some(value),
            "error" => result.error = Some(value),
            _ => {}
        }
    }

    result
}

/// Loopback listener configuration.
///
/// This is a plain value so the port can be chosen per call; tests bind
/// an ephemeral port while the real flow uses [`DEFAULT_PORT`], which
/// must match the redirect URI registered with the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopbackListener {
    port: u16,
}

impl LoopbackListener {
    /// Creates a listener configuration for the given port.
    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self { port }
    }

    /// Returns the configured port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the redirect URI for this listener.
    ///
    /// The authorization request must be built with exactly this value,
    /// since the server validates redirect URIs verbatim.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/", self.port)
    }

    /// Binds the loopback socket.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound, typically because a
    /// previous run is still holding it.
    pub async fn bind(self) -> Result<BoundListener> {
        let listener = TcpListener::bind(("127.0.0.1", self.port)).await?;
        Ok(BoundListener { listener })
    }
}

impl Default for LoopbackListener {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}

/// A bound loopback socket waiting for the redirect.
///
/// The socket is released when this value is dropped, whether the wait
/// completed, failed, or was cancelled.
#[derive(Debug)]
pub struct BoundListener {
    listener: TcpListener,
}

impl BoundListener {
    /// Returns the port actually bound, useful when binding port 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the local address cannot be read.
    pub fn local_port(&self) -> Result<u16> {
        Ok(self.listener.local_addr()?.port())
    }

    /// Serves exactly one request and returns the parsed callback.
    ///
    /// The confirmation page is fully written to the peer before the
    /// socket is released. Connections after the first are refused by
    /// the OS once this future completes.
    ///
    /// # Errors
    ///
    /// Returns an error if accepting, reading, or responding fails.
    pub async fn accept_once(self) -> Result<AuthorizationResult> {
        let (mut socket, _addr) = self.listener.accept().await?;

        let mut buf = vec![0u8; 8192];
        let n = socket.read(&mut buf).await?;
        let request = String::from_utf8_lossy(&buf[..n]);
        let query = request_query(&request);

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{CONFIRMATION_HTML}",
            CONFIRMATION_HTML.len()
        );
        socket.write_all(response.as_bytes()).await?;
        socket.flush().await?;

        Ok(parse_callback_query(query))
    }
}

/// Extracts the query string from the request line of an HTTP request.
///
/// Expects the first line to be `GET /path?key=val&... HTTP/1.1`.
fn request_query(request: &str) -> &str {
    request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|target| target.split_once('?'))
        .map_or("", |(_, query)| query)
}

/// Drives a complete authorization round trip.
///
/// Opens the consent URL in a browser, then blocks on the loopback
/// listener for the redirect. Browser launch is fire-and-forget: if it
/// fails the URL is logged for manual opening and the wait proceeds.
#[derive(Debug)]
pub struct Authorizer<B = SystemBrowser> {
    listener: LoopbackListener,
    browser: B,
}

impl Authorizer {
    /// Creates an authorizer using the platform default browser.
    #[must_use]
    pub const fn new(listener: LoopbackListener) -> Self {
        Self {
            listener,
            browser: SystemBrowser,
        }
    }
}

impl<B: BrowserLauncher> Authorizer<B> {
    /// Creates an authorizer with a custom browser launcher.
    #[must_use]
    pub const fn with_browser(listener: LoopbackListener, browser: B) -> Self {
        Self { listener, browser }
    }

    /// Returns the redirect URI the listener will serve.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        self.listener.redirect_uri()
    }

    /// Runs one authorization attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the exchange
    /// with the browser fails. A failed browser launch is not an error.
    pub async fn authorize(&self, auth_url: &str) -> Result<AuthorizationResult> {
        if let Err(e) = self.browser.open(auth_url) {
            warn!("Failed to open browser: {e}");
            info!("Please manually open the following URL: {auth_url}");
        }

        let bound = self.listener.bind().await?;
        info!(
            "Waiting for authorization response on {}",
            self.listener.redirect_uri()
        );
        bound.accept_once().await
    }

    /// Runs one authorization attempt, giving up after `timeout`.
    ///
    /// On timeout the listener is dropped, releasing the port.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if no redirect arrives in time, otherwise the
    /// same errors as [`Self::authorize`].
    pub async fn authorize_with_timeout(
        &self,
        auth_url: &str,
        timeout: Duration,
    ) -> Result<AuthorizationResult> {
        match tokio::time::timeout(timeout, self.authorize(auth_url)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(timeout.as_secs())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_code_with_extra_params() {
        let result = parse_callback_query("code=ABC123&state=xyz");
        assert_eq!(result.code.as_deref(), Some("ABC123"));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_parse_error() {
        let result = parse_callback_query("error=access_denied");
        assert!(result.code.is_none());
        assert_eq!(result.error.as_deref(), Some("access_denied"));
    }

    #[test]
    fn test_parse_empty_query() {
        let result = parse_callback_query("");
        assert!(result.code.is_none());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_parse_strips_leading_question_mark() {
        let result = parse_callback_query("?code=ABC123");
        assert_eq!(result.code.as_deref(), Some("ABC123"));
    }

    #[test]
    fn test_parse_percent_decodes_value() {
        let result = parse_callback_query("code=4%2F0Axyz%3D%3D");
        assert_eq!(result.code.as_deref(), Some("4/0Axyz=="));
    }

    #[test]
    fn test_parse_plus_left_alone() {
        // Query values are percent-decoded only, never form-decoded.
        let result = parse_callback_query("code=a+b");
        assert_eq!(result.code.as_deref(), Some("a+b"));
    }

    #[test]
    fn test_parse_splits_on_first_equals() {
        let result = parse_callback_query("code=abc=def");
        assert_eq!(result.code.as_deref(), Some("abc=def"));
    }

    #[test]
    fn test_parse_keys_are_case_sensitive() {
        let result = parse_callback_query("Code=ABC123&ERROR=nope");
        assert!(result.code.is_none());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_parse_ignores_bare_keys() {
        let result = parse_callback_query("code&error=denied");
        assert!(result.code.is_none());
        assert_eq!(result.error.as_deref(), Some("denied"));
    }

    #[test]
    fn test_into_code_success() {
        let result = AuthorizationResult {
            code: Some("ABC".to_string()),
            error: None,
        };
        assert_eq!(result.into_code().unwrap(), "ABC");
    }

    #[test]
    fn test_into_code_error_wins() {
        let result = AuthorizationResult {
            code: Some("ABC".to_string()),
            error: Some("access_denied".to_string()),
        };
        assert!(matches!(result.into_code(), Err(Error::Denied(e)) if e == "access_denied"));
    }

    #[test]
    fn test_into_code_empty() {
        let result = AuthorizationResult::default();
        assert!(matches!(result.into_code(), Err(Error::NoAuthorizationCode)));
    }

    #[test]
    fn test_request_query_extraction() {
        assert_eq!(
            request_query("GET /?code=abc HTTP/1.1\r\nHost: localhost\r\n\r\n"),
            "code=abc"
        );
        assert_eq!(request_query("GET / HTTP/1.1\r\n\r\n"), "");
        assert_eq!(request_query(""), "");
    }

    #[test]
    fn test_redirect_uri_format() {
        assert_eq!(
            LoopbackListener::default().redirect_uri(),
            "http://localhost:8080/"
        );
        assert_eq!(
            LoopbackListener::new(9123).redirect_uri(),
            "http://localhost:9123/"
        );
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(query in ".*") {
            let _ = parse_callback_query(&query);
        }

        #[test]
        fn prop_encoded_code_value_recovered(value in "[A-Za-z0-9._~/=+-]{1,64}") {
            let encoded = percent_encoding::utf8_percent_encode(
                &value,
                percent_encoding::NON_ALPHANUMERIC,
            )
            .to_string();
            let result = parse_callback_query(&format!("code={encoded}&state=xyz"));
            prop_assert_eq!(result.code.as_deref(), Some(value.as_str()));
        }
    }
}
