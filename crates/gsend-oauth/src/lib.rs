//! # gsend-oauth
//!
//! `OAuth2` authorization for Gmail with a local loopback redirect.
//!
//! ## Features
//!
//! - **Loopback capture**: fixed-port local HTTP listener that serves
//!   exactly one redirect and hands back the `code`/`error` parameters
//! - **Authorization code flow**: consent URL building, code exchange,
//!   and refresh against the provider's token endpoint
//! - **Token management**: expiration checking with a refresh buffer
//! - **SASL XOAUTH2**: initial-response formatting for IMAP/SMTP
//!
//! ## Quick Start
//!
//! ### Interactive Authorization
//!
//! ```ignore
//! use gsend_oauth::{Authorizer, LoopbackListener, OAuthClient, Provider};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let listener = LoopbackListener::default();
//!     let authorizer = Authorizer::new(listener);
//!
//!     let provider = Provider::google()?;
//!     let client = OAuthClient::new("your_client_id", provider)
//!         .with_client_secret("your_secret")
//!         .with_redirect_uri(listener.redirect_uri());
//!
//!     let auth_url = client.authorization_url(None);
//!     let result = authorizer
//!         .authorize_with_timeout(auth_url.as_str(), Duration::from_secs(300))
//!         .await?;
//!
//!     let token = client.exchange_code(&result.into_code()?).await?;
//!     println!("Access token: {}", token.access_token);
//!     Ok(())
//! }
//! ```
//!
//! ### Using with IMAP/SMTP
//!
//! ```ignore
//! use gsend_oauth::sasl::xoauth2_response;
//!
//! let auth_string = xoauth2_response("user@gmail.com", &token.access_token);
//! // Send: AUTHENTICATE XOAUTH2 {auth_string}
//! ```
//!
//! ### Token Refresh
//!
//! ```ignore
//! // Check if token needs refresh
//! if token.is_expired() {
//!     let new_token = client.refresh_token(&token).await?;
//!     // Use new_token
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;

pub mod browser;
pub mod flow;
pub mod loopback;
pub mod provider;
pub mod sasl;
pub mod token;

pub use browser::{BrowserLauncher, SystemBrowser};
pub use error::{Error, Result};
pub use flow::OAuthClient;
pub use loopback::{
    AuthorizationResult, Authorizer, BoundListener, DEFAULT_PORT, LoopbackListener,
};
pub use provider::Provider;
pub use token::Token;
