//! Browser launching for the consent step.

use crate::error::{Error, Result};

/// Opens URLs in the user's browser.
///
/// The authorizer takes this as a capability so tests can substitute a
/// recording implementation instead of launching a real browser.
pub trait BrowserLauncher {
    /// Opens the given URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser could not be launched.
    fn open(&self, url: &str) -> Result<()>;
}

/// Launches the platform default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        opener::open_browser(url).map_err(|e| Error::Browser(e.to_string()))
    }
}
