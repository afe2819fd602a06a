//! Token acquisition and refresh orchestration.
//!
//! Works down the cache-refresh-authorize ladder: a valid cached token
//! is used as-is, an expired one is refreshed when possible, and only
//! then is the user sent through the browser consent flow.

use std::time::Duration;

use gsend_oauth::browser::BrowserLauncher;
use gsend_oauth::{Authorizer, LoopbackListener, OAuthClient, Provider, SystemBrowser, Token};
use tracing::{debug, info, warn};

use crate::credentials::{ClientSecrets, TokenStore};
use crate::error::Result;

/// Acquires access tokens, caching them across runs.
#[derive(Debug)]
pub struct TokenProvider<B = SystemBrowser> {
    client: OAuthClient,
    scopes: Vec<String>,
    store: TokenStore,
    authorizer: Authorizer<B>,
}

impl TokenProvider {
    /// Creates a provider using the platform default browser.
    ///
    /// The listener's redirect URI is wired into the OAuth client so
    /// the consent request and the callback endpoint always agree.
    #[must_use]
    pub fn new(
        secrets: &ClientSecrets,
        provider: Provider,
        scopes: Vec<String>,
        store: TokenStore,
        listener: LoopbackListener,
    ) -> Self {
        Self::with_browser(secrets, provider, scopes, store, listener, SystemBrowser)
    }
}

impl<B: BrowserLauncher> TokenProvider<B> {
    /// Creates a provider with a custom browser launcher.
    #[must_use]
    pub fn with_browser(
        secrets: &ClientSecrets,
        provider: Provider,
        scopes: Vec<String>,
        store: TokenStore,
        listener: LoopbackListener,
        browser: B,
    ) -> Self {
        let mut client = OAuthClient::new(&secrets.client_id, provider)
            .with_redirect_uri(listener.redirect_uri());
        if let Some(secret) = &secrets.client_secret {
            client = client.with_client_secret(secret);
        }

        Self {
            client,
            scopes,
            store,
            authorizer: Authorizer::with_browser(listener, browser),
        }
    }

    /// Returns a valid access token, authorizing interactively if needed.
    ///
    /// Tries the cached token first, then a refresh, and finally the
    /// full browser consent flow with `timeout` bounding the wait for
    /// the redirect. Whatever succeeds is written back to the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if every rung of the ladder fails or the cache
    /// cannot be written.
    pub async fn ensure_token(&self, timeout: Duration) -> Result<Token> {
        if let Some(token) = self.store.load()? {
            if token.is_valid() {
                debug!("Using cached token from {}", self.store.path().display());
                return Ok(token);
            }

            if token.refresh_token.is_some() {
                match self.client.refresh_token(&token).await {
                    Ok(refreshed) => {
                        self.store.save(&refreshed)?;
                        debug!("Refreshed expired token");
                        return Ok(refreshed);
                    }
                    Err(e) => warn!("Token refresh failed, starting a new authorization: {e}"),
                }
            }
        }

        let token = self.authorize(timeout).await?;
        self.store.save(&token)?;
        Ok(token)
    }

    /// Runs the interactive consent flow once.
    async fn authorize(&self, timeout: Duration) -> Result<Token> {
        let auth_url = self.client.authorization_url(Some(&self.scopes));
        info!("Authorizing against {}", self.client.provider.name);

        let result = self
            .authorizer
            .authorize_with_timeout(auth_url.as_str(), timeout)
            .await?;
        let code = result.into_code()?;

        let token = self.client.exchange_code(&code).await?;
        Ok(token)
    }
}
