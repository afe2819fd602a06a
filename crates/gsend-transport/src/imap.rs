//! IMAP append transport for sent-mail copies.

use std::sync::Arc;

use gsend_oauth::sasl;
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::{
    TlsConnector,
    rustls::{ClientConfig, RootCertStore},
};
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::debug;

use crate::error::{Error, Result};

/// Gmail IMAP host.
pub const GMAIL_IMAP_HOST: &str = "imap.gmail.com";

/// Gmail IMAP port (implicit TLS).
pub const GMAIL_IMAP_PORT: u16 = 993;

/// Gmail folder that holds sent mail.
pub const GMAIL_SENT_FOLDER: &str = "[Gmail]/Sent Mail";

type ImapSession = async_imap::Session<Compat<TlsStream<TcpStream>>>;

/// XOAUTH2 SASL exchange for IMAP.
///
/// The initial response is handed over raw; the protocol layer applies
/// the base64 encoding.
struct XOAuth2<'a> {
    user: &'a str,
    access_token: &'a str,
}

impl async_imap::Authenticator for XOAuth2<'_> {
    type Response = String;

    fn process(&mut self, _challenge: &[u8]) -> Self::Response {
        sasl::xoauth2_initial_response(self.user, self.access_token)
    }
}

/// Appends raw messages to a mailbox over IMAP with XOAUTH2.
#[derive(Debug, Clone)]
pub struct SentMailbox {
    host: String,
    port: u16,
    folder: String,
}

impl SentMailbox {
    /// Creates an appender for Gmail's sent-mail folder.
    #[must_use]
    pub fn gmail() -> Self {
        Self::new(GMAIL_IMAP_HOST, GMAIL_IMAP_PORT)
    }

    /// Creates an appender for an arbitrary IMAP host, targeting
    /// [`GMAIL_SENT_FOLDER`].
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            folder: GMAIL_SENT_FOLDER.to_string(),
        }
    }

    /// Overrides the target folder.
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Appends a raw RFC 2822 message to the folder.
    ///
    /// Gmail files SMTP submissions into sent mail on its own; this is
    /// for servers that leave that bookkeeping to the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection, the authentication, or the
    /// append fails.
    pub async fn append_raw(&self, user: &str, access_token: &str, mime: &[u8]) -> Result<()> {
        let mut session = self.authenticate(user, access_token).await?;

        let result = session.append(&self.folder, None, None, mime).await;
        let _ = session.logout().await;
        result?;

        debug!("Appended message copy to {} for {user}", self.folder);
        Ok(())
    }

    async fn authenticate(&self, user: &str, access_token: &str) -> Result<ImapSession> {
        let tls_stream = self.connect_tls().await?;
        let mut client = async_imap::Client::new(tls_stream);

        // AUTHENTICATE does not consume the server greeting on its own,
        // unlike LOGIN.
        client
            .read_response()
            .await
            .ok_or_else(|| Error::Protocol("Connection closed before greeting".into()))??;

        let auth = XOAuth2 { user, access_token };
        client
            .authenticate("XOAUTH2", auth)
            .await
            .map_err(|(err, _client)| Error::Imap(err))
    }

    async fn connect_tls(&self) -> Result<Compat<TlsStream<TcpStream>>> {
        let addr = format!("{}:{}", self.host, self.port);
        let tcp_stream = TcpStream::connect(&addr).await?;

        let connector = create_tls_connector();
        let server_name = ServerName::try_from(self.host.clone())
            .map_err(|_| Error::Protocol(format!("Invalid hostname: {}", self.host)))?;

        let tls_stream = connector.connect(server_name, tcp_stream).await?;
        Ok(tls_stream.compat())
    }
}

/// Creates a TLS connector with system root certificates.
fn create_tls_connector() -> TlsConnector {
    let root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
}
