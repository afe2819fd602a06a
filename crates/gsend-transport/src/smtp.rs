//! SMTP submission transport authenticating with XOAUTH2.

use lettre::address::Envelope;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::debug;

use crate::error::Result;

/// Gmail SMTP submission host.
pub const GMAIL_SMTP_HOST: &str = "smtp.gmail.com";

/// Gmail SMTP submission port (STARTTLS).
pub const GMAIL_SMTP_PORT: u16 = 587;

/// Submits raw messages over SMTP with an OAuth2 access token.
#[derive(Debug, Clone)]
pub struct SmtpSender {
    host: String,
    port: u16,
}

impl SmtpSender {
    /// Creates a sender against Gmail's submission endpoint.
    #[must_use]
    pub fn gmail() -> Self {
        Self::new(GMAIL_SMTP_HOST, GMAIL_SMTP_PORT)
    }

    /// Creates a sender for an arbitrary submission host.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Submits a raw RFC 2822 message for `recipient`.
    ///
    /// Authenticates as `user` with the XOAUTH2 SASL mechanism, so the
    /// password slot carries the OAuth2 access token.
    ///
    /// # Errors
    ///
    /// Returns an error if an address fails to parse, the connection
    /// cannot be established, or the server rejects the submission.
    pub async fn send_raw(
        &self,
        user: &str,
        access_token: &str,
        recipient: &str,
        mime: &[u8],
    ) -> Result<()> {
        let credentials = Credentials::new(user.to_string(), access_token.to_string());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
            .credentials(credentials)
            .authentication(vec![Mechanism::Xoauth2])
            .port(self.port)
            .build();

        let from: Address = user.parse()?;
        let to: Address = recipient.parse()?;
        let envelope = Envelope::new(Some(from), vec![to])?;

        mailer.send_raw(&envelope, mime).await?;
        debug!("Submitted message for {recipient} via {}:{}", self.host, self.port);
        Ok(())
    }
}
