//! Gmail REST API send transport.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Gmail API base URL.
const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// Gmail REST API client for sending raw messages.
#[derive(Debug, Clone)]
pub struct GmailClient {
    http_client: Client,
    base_url: String,
}

/// Response from the send endpoint.
#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

impl GmailClient {
    /// Creates a client against the production Gmail API.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(GMAIL_API_BASE)
    }

    /// Creates a client with a custom base URL (for testing).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Sends a raw RFC 2822 message as the authenticated user.
    ///
    /// The message is base64url-encoded into the `raw` request field as
    /// the API requires. Returns the Gmail message id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers with a
    /// non-success status.
    pub async fn send_raw(&self, access_token: &str, mime: &str) -> Result<String> {
        let encoded = URL_SAFE_NO_PAD.encode(mime.as_bytes());

        let url = format!("{}/messages/send", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "raw": encoded }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        let sent: SendResponse = response.json().await?;
        debug!("Sent Gmail message, id={}", sent.id);
        Ok(sent.id)
    }
}

impl Default for GmailClient {
    fn default() -> Self {
        Self::new()
    }
}
