//! # gsend-mime
//!
//! MIME multipart message building for Gmail delivery.
//!
//! ## Features
//!
//! - **Message building**: `multipart/mixed` messages with a plain text
//!   body and file attachments
//! - **Sender identities**: plain, delegated (`From` + `Sender`), and
//!   alias (`From` only) header layouts
//! - **Encoding**: Base64 with RFC 2045 line wrapping, plus the URL-safe
//!   unpadded variant the Gmail REST API expects
//! - **Content types**: extension-based MIME type lookup for attachments
//!
//! ## Quick Start
//!
//! ### Building a Message
//!
//! ```ignore
//! use gsend_mime::OutboundMessage;
//!
//! let message = OutboundMessage::new("recipient@example.com", "Report")
//!     .with_body("Please find the report attached.")
//!     .with_attachment("report.pdf")
//!     .build()?;
//!
//! println!("{message}");
//! ```
//!
//! ### Sending on Behalf of Another Address
//!
//! ```ignore
//! use gsend_mime::{OutboundMessage, SenderMode};
//!
//! let message = OutboundMessage::new("recipient@example.com", "Update")
//!     .with_body("Sent by a delegate.")
//!     .with_sender(SenderMode::OnBehalfOf {
//!         primary: "boss@example.com".to_string(),
//!         send_as: "assistant@example.com".to_string(),
//!     })
//!     .build()?;
//! ```
//!
//! ### Encoding for the REST API
//!
//! ```ignore
//! use gsend_mime::OutboundMessage;
//!
//! let raw = OutboundMessage::new("recipient@example.com", "Hi")
//!     .with_body("Hello!")
//!     .build_raw()?;
//! // `raw` goes straight into the API's `raw` message field.
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod message;

pub mod content_type;
pub mod encoding;

pub use error::{Error, Result};
pub use message::{Attachment, OutboundMessage, SenderMode};
