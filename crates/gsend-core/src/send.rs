//! One-shot send operations tying authorization, message building, and
//! delivery together.

use std::time::Duration;

use gsend_mime::OutboundMessage;
use gsend_oauth::browser::BrowserLauncher;
use gsend_transport::{GmailClient, SentMailbox, SmtpSender};
use tracing::info;

use crate::auth::TokenProvider;
use crate::error::Result;

/// Sends a message through the Gmail REST API.
///
/// Returns the Gmail message id.
///
/// # Errors
///
/// Returns an error if authorization, message building, or the API
/// call fails.
pub async fn send_via_api<B: BrowserLauncher>(
    tokens: &TokenProvider<B>,
    client: &GmailClient,
    message: &OutboundMessage,
    timeout: Duration,
) -> Result<String> {
    let token = tokens.ensure_token(timeout).await?;
    let mime = message.build()?;

    let id = client.send_raw(&token.access_token, &mime).await?;
    info!("Sent message {id} to {}", message.to);
    Ok(id)
}

/// Sends a message through SMTP submission as `user`.
///
/// # Errors
///
/// Returns an error if authorization, message building, or the
/// submission fails.
pub async fn send_via_smtp<B: BrowserLauncher>(
    tokens: &TokenProvider<B>,
    sender: &SmtpSender,
    user: &str,
    message: &OutboundMessage,
    timeout: Duration,
) -> Result<()> {
    let token = tokens.ensure_token(timeout).await?;
    let mime = message.build()?;

    sender
        .send_raw(user, &token.access_token, &message.to, mime.as_bytes())
        .await?;
    info!("Submitted message to {}", message.to);
    Ok(())
}

/// Sends through SMTP and appends a copy to the sent folder over IMAP.
///
/// The message is built once, so the submitted bytes and the filed
/// copy are identical. The append runs only after a successful
/// submission.
///
/// # Errors
///
/// Returns an error if any stage fails.
pub async fn send_via_smtp_with_copy<B: BrowserLauncher>(
    tokens: &TokenProvider<B>,
    sender: &SmtpSender,
    mailbox: &SentMailbox,
    user: &str,
    message: &OutboundMessage,
    timeout: Duration,
) -> Result<()> {
    let token = tokens.ensure_token(timeout).await?;
    let mime = message.build()?;

    sender
        .send_raw(user, &token.access_token, &message.to, mime.as_bytes())
        .await?;
    mailbox
        .append_raw(user, &token.access_token, mime.as_bytes())
        .await?;
    info!("Submitted message to {} and filed a sent copy", message.to);
    Ok(())
}
