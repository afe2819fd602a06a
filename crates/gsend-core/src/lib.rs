//! # gsend-core
//!
//! Orchestration layer for the `gsend` mail sender.
//!
//! This crate provides:
//! - Client secrets loading (`credentials.json`)
//! - Token caching and the cache-refresh-authorize ladder
//! - One-shot send operations over the REST, SMTP, and IMAP transports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod credentials;
mod error;
pub mod send;

pub use auth::TokenProvider;
pub use credentials::{ClientSecrets, TokenStore};
pub use error::{Error, Result};
pub use send::{send_via_api, send_via_smtp, send_via_smtp_with_copy};
