//! # gsend-transport
//!
//! Delivery backends for handing a finished RFC 2822 message to Gmail.
//!
//! ## Features
//!
//! - **REST**: `users.messages.send` with the base64url `raw` payload
//! - **SMTP**: STARTTLS submission via `lettre` with XOAUTH2
//! - **IMAP**: APPEND of a sent-mail copy via `async-imap` with XOAUTH2
//!
//! ## Quick Start
//!
//! ```ignore
//! use gsend_transport::GmailClient;
//!
//! #[tokio::main]
//! async fn main() -> gsend_transport::Result<()> {
//!     let client = GmailClient::new();
//!     let id = client.send_raw(&access_token, &mime).await?;
//!     println!("sent {id}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod gmail;
pub mod imap;
pub mod smtp;

pub use error::{Error, Result};
pub use gmail::GmailClient;
pub use imap::SentMailbox;
pub use smtp::SmtpSender;
