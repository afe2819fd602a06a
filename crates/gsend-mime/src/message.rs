//! Outbound message construction.
//!
//! Builds RFC 2822 `multipart/mixed` messages with a plain text body and
//! optional Base64-encoded file attachments, in the exact header layout
//! Gmail expects for delegated and alias sending.

use crate::content_type;
use crate::encoding;
use crate::error::{Error, Result};
use rand::Rng;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// How the sender identity is expressed in the message headers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SenderMode {
    /// No `From` header; the delivering account is the sender.
    #[default]
    AsSelf,
    /// Delegated sending: `From` names the primary account and `Sender`
    /// names the delegate address actually sending.
    OnBehalfOf {
        /// Primary account address shown in `From`.
        primary: String,
        /// Delegate address shown in `Sender`.
        send_as: String,
    },
    /// Alias sending: `From` names the send-as address outright.
    AsIdentity {
        /// Alias address shown in `From`.
        send_as: String,
    },
}

/// A file attachment loaded into memory.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// File name presented in the part headers.
    pub file_name: String,
    /// MIME type derived from the file extension.
    pub mime_type: &'static str,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl Attachment {
    /// Loads an attachment from disk.
    ///
    /// Returns `Ok(None)` when the path does not name an existing regular
    /// file; missing attachments are skipped rather than treated as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }

        let data = std::fs::read(path).map_err(|source| Error::AttachmentRead {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned());

        Ok(Some(Self {
            file_name,
            mime_type: content_type::mime_type_for_path(path),
            data,
        }))
    }
}

/// An outbound email message.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
    /// Sender identity headers.
    pub sender: SenderMode,
    /// Attachment file paths, in the order they appear in the message.
    pub attachments: Vec<PathBuf>,
}

impl OutboundMessage {
    /// Creates a new outbound message.
    #[must_use]
    pub fn new(to: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: String::new(),
            sender: SenderMode::AsSelf,
            attachments: Vec::new(),
        }
    }

    /// Sets the plain text body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the sender identity headers.
    #[must_use]
    pub fn with_sender(mut self, sender: SenderMode) -> Self {
        self.sender = sender;
        self
    }

    /// Adds an attachment path.
    #[must_use]
    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(path.into());
        self
    }

    /// Builds the RFC 2822 multipart message.
    ///
    /// Attachment paths that do not name an existing file are skipped.
    /// Lines are CRLF terminated throughout.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipient or subject is empty, or if an
    /// existing attachment file cannot be read.
    pub fn build(&self) -> Result<String> {
        if self.to.is_empty() {
            return Err(Error::MissingField("to"));
        }
        if self.subject.is_empty() {
            return Err(Error::MissingField("subject"));
        }

        let boundary = generate_boundary();
        let mut message = String::new();

        // Headers
        match &self.sender {
            SenderMode::AsSelf => {}
            SenderMode::OnBehalfOf { primary, send_as } => {
                let _ = writeln!(message, "From: {primary}\r");
                let _ = writeln!(message, "Sender: {send_as}\r");
            }
            SenderMode::AsIdentity { send_as } => {
                let _ = writeln!(message, "From: {send_as}\r");
            }
        }

        let _ = writeln!(message, "To: {}\r", self.to);
        let _ = writeln!(message, "Subject: {}\r", self.subject);
        message.push_str("MIME-Version: 1.0\r\n");
        let _ = writeln!(message, "Content-Type: multipart/mixed; boundary=\"{boundary}\"\r");

        // Empty line between headers and body
        message.push_str("\r\n");

        // Text part
        let _ = writeln!(message, "--{boundary}\r");
        message.push_str("Content-Type: text/plain; charset=utf-8\r\n");
        message.push_str("Content-Transfer-Encoding: 7bit\r\n");
        message.push_str("\r\n");
        let _ = writeln!(message, "{}\r", self.body);

        // Attachment parts, in declaration order
        for path in &self.attachments {
            let Some(attachment) = Attachment::load(path)? else {
                continue;
            };

            let _ = writeln!(message, "--{boundary}\r");
            let _ = writeln!(
                message,
                "Content-Type: {}; name=\"{}\"\r",
                attachment.mime_type, attachment.file_name
            );
            message.push_str("Content-Transfer-Encoding: base64\r\n");
            let _ = writeln!(
                message,
                "Content-Disposition: attachment; filename=\"{}\"\r",
                attachment.file_name
            );
            message.push_str("\r\n");
            message.push_str(&encoding::encode_base64_wrapped(&attachment.data));
        }

        let _ = writeln!(message, "--{boundary}--\r");

        Ok(message)
    }

    /// Builds the message and encodes it in the URL-safe unpadded Base64
    /// form the Gmail REST API expects for the `raw` field.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Self::build`] fails.
    pub fn build_raw(&self) -> Result<String> {
        Ok(encoding::encode_base64url(self.build()?.as_bytes()))
    }
}

/// Generates a unique multipart boundary.
///
/// Format: `==Boundary_` followed by 32 lowercase hex digits.
fn generate_boundary() -> String {
    let mut boundary = String::with_capacity(43);
    boundary.push_str("==Boundary_");
    for _ in 0..16 {
        let byte = rand::thread_rng().r#gen::<u8>();
        let _ = write!(boundary, "{byte:02x}");
    }
    boundary
}
