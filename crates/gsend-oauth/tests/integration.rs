//! Integration tests for the loopback authorization flow.
//!
//! These drive real sockets on ephemeral ports: a client task plays the
//! part of the redirected browser while the listener blocks for it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use gsend_oauth::browser::BrowserLauncher;
use gsend_oauth::{Authorizer, Error, LoopbackListener, OAuthClient, Provider, Token};

const CONFIRMATION_TEXT: &str = "Authentication complete. You can close this window now.";

/// Sends one HTTP GET to the listener and returns the full response.
async fn send_callback(port: u16, target: &str) -> String {
    let mut stream = connect_with_retry(port).await;
    let request =
        format!("GET {target} HTTP/1.1\r\nHost: localhost:{port}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

/// Connects to the loopback port, retrying until the listener is up.
async fn connect_with_retry(port: u16) -> TcpStream {
    for _ in 0..100 {
        if let Ok(stream) = TcpStream::connect(("127.0.0.1", port)).await {
            return stream;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("listener on port {port} never came up");
}

/// Picks a port that is currently free.
async fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Browser that records the URLs it was asked to open.
#[derive(Clone, Default)]
struct RecordingBrowser {
    urls: Arc<Mutex<Vec<String>>>,
}

impl BrowserLauncher for RecordingBrowser {
    fn open(&self, url: &str) -> gsend_oauth::Result<()> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Browser that always fails to launch.
struct FailingBrowser;

impl BrowserLauncher for FailingBrowser {
    fn open(&self, _url: &str) -> gsend_oauth::Result<()> {
        Err(Error::Browser("no display".to_string()))
    }
}

#[tokio::test]
async fn test_capture_code_and_confirm() {
    let bound = LoopbackListener::new(0).bind().await.unwrap();
    let port = bound.local_port().unwrap();

    let client = tokio::spawn(async move {
        send_callback(port, "/?code=test_code_123&state=ignored").await
    });

    let result = bound.accept_once().await.unwrap();
    assert_eq!(result.code.as_deref(), Some("test_code_123"));
    assert!(result.error.is_none());

    let response = client.await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("Content-Type: text/html\r\n"));
    assert!(response.contains(CONFIRMATION_TEXT));

    // The port is released once the listener is dropped.
    LoopbackListener::new(port).bind().await.unwrap();
}

#[tokio::test]
async fn test_capture_error_redirect() {
    let bound = LoopbackListener::new(0).bind().await.unwrap();
    let port = bound.local_port().unwrap();

    let client = tokio::spawn(async move { send_callback(port, "/?error=access_denied").await });

    let result = bound.accept_once().await.unwrap();
    assert!(result.code.is_none());
    assert_eq!(result.error.as_deref(), Some("access_denied"));

    // The browser still gets the confirmation page on error redirects.
    let response = client.await.unwrap();
    assert!(response.contains(CONFIRMATION_TEXT));

    assert!(matches!(result.into_code(), Err(Error::Denied(_))));
}

#[tokio::test]
async fn test_capture_without_parameters() {
    let bound = LoopbackListener::new(0).bind().await.unwrap();
    let port = bound.local_port().unwrap();

    let client = tokio::spawn(async move { send_callback(port, "/").await });

    let result = bound.accept_once().await.unwrap();
    assert!(result.code.is_none());
    assert!(result.error.is_none());
    client.await.unwrap();

    assert!(matches!(result.into_code(), Err(Error::NoAuthorizationCode)));
}

#[tokio::test]
async fn test_response_declares_content_length() {
    let bound = LoopbackListener::new(0).bind().await.unwrap();
    let port = bound.local_port().unwrap();

    let client = tokio::spawn(async move { send_callback(port, "/?code=x").await });
    bound.accept_once().await.unwrap();

    let response = client.await.unwrap();
    let (headers, body) = response.split_once("\r\n\r\n").unwrap();
    assert!(headers.contains(&format!("Content-Length: {}", body.len())));
    assert!(body.ends_with("</html>"));
}

#[tokio::test]
async fn test_authorize_opens_browser_and_captures() {
    let port = free_port().await;
    let browser = RecordingBrowser::default();
    let authorizer = Authorizer::with_browser(LoopbackListener::new(port), browser.clone());

    let client = tokio::spawn(async move { send_callback(port, "/?code=granted").await });

    let result = authorizer
        .authorize("https://example.com/auth?client_id=abc")
        .await
        .unwrap();
    assert_eq!(result.code.as_deref(), Some("granted"));
    client.await.unwrap();

    let urls = browser.urls.lock().unwrap();
    assert_eq!(urls.as_slice(), ["https://example.com/auth?client_id=abc"]);
}

#[tokio::test]
async fn test_authorize_survives_browser_failure() {
    let port = free_port().await;
    let authorizer = Authorizer::with_browser(LoopbackListener::new(port), FailingBrowser);

    let client = tokio::spawn(async move { send_callback(port, "/?code=manual").await });

    let result = authorizer
        .authorize("https://example.com/auth")
        .await
        .unwrap();
    assert_eq!(result.code.as_deref(), Some("manual"));
    client.await.unwrap();
}

#[tokio::test]
async fn test_authorize_timeout_releases_port() {
    let port = free_port().await;
    let authorizer = Authorizer::with_browser(LoopbackListener::new(port), RecordingBrowser::default());

    let result = authorizer
        .authorize_with_timeout("https://example.com/auth", Duration::from_millis(50))
        .await;
    assert!(matches!(result, Err(Error::Timeout(_))));

    // The timed-out wait must not leak the fixed port.
    LoopbackListener::new(port).bind().await.unwrap();
}

/// Reads one HTTP request from the socket, honoring Content-Length.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "peer closed before request completed");
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .map_or(0, |v| v.trim().parse::<usize>().unwrap());

    while data.len() < header_end + content_length {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "peer closed mid-body");
        data.extend_from_slice(&buf[..n]);
    }

    String::from_utf8_lossy(&data).into_owned()
}

/// Serves one canned HTTP response and returns the request received.
async fn token_endpoint_once(
    listener: TcpListener,
    status: &'static str,
    body: &'static str,
) -> String {
    let (mut socket, _) = listener.accept().await.unwrap();
    let request = read_request(&mut socket).await;
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    socket.write_all(response.as_bytes()).await.unwrap();
    socket.shutdown().await.unwrap();
    request
}

fn client_against(port: u16) -> OAuthClient {
    let provider = Provider::new(
        "Google",
        "https://accounts.google.com/o/oauth2/v2/auth",
        format!("http://127.0.0.1:{port}/token"),
        Vec::new(),
    )
    .unwrap();
    OAuthClient::new("client-id", provider)
        .with_client_secret("client-secret")
        .with_redirect_uri("http://localhost:8080/")
}

#[tokio::test]
async fn test_exchange_code_round_trip() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(token_endpoint_once(
        listener,
        "200 OK",
        r#"{"access_token":"ya29.test","token_type":"Bearer","expires_in":3600,"refresh_token":"1//refresh"}"#,
    ));

    let client = client_against(port);
    let token = client.exchange_code("auth-code-123").await.unwrap();
    assert_eq!(token.access_token, "ya29.test");
    assert_eq!(token.refresh_token.as_deref(), Some("1//refresh"));
    assert!(token.is_valid());

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /token HTTP/1.1\r\n"));
    let body = request.split("\r\n\r\n").nth(1).unwrap();
    assert!(body.contains("grant_type=authorization_code"));
    assert!(body.contains("code=auth-code-123"));
    assert!(body.contains("client_id=client-id"));
    assert!(body.contains("client_secret=client-secret"));
    assert!(body.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2F"));
}

#[tokio::test]
async fn test_exchange_code_server_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(token_endpoint_once(
        listener,
        "400 Bad Request",
        r#"{"error":"invalid_grant","error_description":"Malformed auth code."}"#,
    ));

    let client = client_against(port);
    let result = client.exchange_code("bad-code").await;
    server.await.unwrap();

    match result {
        Err(Error::OAuth { error, description }) => {
            assert_eq!(error, "invalid_grant");
            assert_eq!(description, "Malformed auth code.");
        }
        other => panic!("expected OAuth error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_refresh_preserves_refresh_token() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    // Google refresh responses omit the refresh token.
    let server = tokio::spawn(token_endpoint_once(
        listener,
        "200 OK",
        r#"{"access_token":"ya29.fresh","token_type":"Bearer","expires_in":3600}"#,
    ));

    let client = client_against(port);
    let old = Token::new("ya29.stale", "Bearer").with_refresh_token("1//old");
    let refreshed = client.refresh_token(&old).await.unwrap();
    assert_eq!(refreshed.access_token, "ya29.fresh");
    assert_eq!(refreshed.refresh_token.as_deref(), Some("1//old"));

    let request = server.await.unwrap();
    let body = request.split("\r\n\r\n").nth(1).unwrap();
    assert!(body.contains("grant_type=refresh_token"));
    assert!(body.contains("refresh_token=1%2F%2Fold"));
}
