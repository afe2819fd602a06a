//! Client secrets and cached token storage.
//!
//! Secrets come from the `credentials.json` file downloaded from the
//! Google Cloud console; tokens are cached in a plain JSON file so
//! later runs skip the browser round trip.

use std::fs;
use std::path::{Path, PathBuf};

use gsend_oauth::Token;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// `OAuth2` client credentials issued by the Google Cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    /// Client id.
    pub client_id: String,
    /// Client secret; absent for public clients.
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// Envelope layout of a downloaded `credentials.json`.
///
/// The console nests the secrets under `installed` or `web` depending
/// on the application type.
#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    installed: Option<ClientSecrets>,
    #[serde(default)]
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Loads client secrets from a `credentials.json` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or carries neither an `installed` nor a `web` section.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parses client secrets from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or carries
    /// neither an `installed` nor a `web` section.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: SecretsFile = serde_json::from_str(contents)?;
        file.installed.or(file.web).ok_or_else(|| {
            Error::Config(
                "credentials file has neither an \"installed\" nor a \"web\" section".into(),
            )
        })
    }
}

/// JSON file cache for the `OAuth2` token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cached token.
    ///
    /// A missing file yields `None`. A malformed cache is treated the
    /// same so a fresh authorization can overwrite it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(&self) -> Result<Option<Token>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&contents) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!("Ignoring malformed token cache {}: {e}", self.path.display());
                Ok(None)
            }
        }
    }

    /// Writes the token to the cache, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(token)?;
        fs::write(&self.path, json)?;
        debug!("Cached token at {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    const INSTALLED: &str = r#"{
        "installed": {
            "client_id": "id-123.apps.googleusercontent.com",
            "project_id": "gsend-test",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "token_uri": "https://oauth2.googleapis.com/token",
            "client_secret": "s3cret",
            "redirect_uris": ["http://localhost"]
        }
    }"#;

    #[test]
    fn test_parse_installed_secrets() {
        let secrets = ClientSecrets::from_json(INSTALLED).unwrap();
        assert_eq!(secrets.client_id, "id-123.apps.googleusercontent.com");
        assert_eq!(secrets.client_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_parse_web_secrets() {
        let secrets = ClientSecrets::from_json(
            r#"{"web": {"client_id": "web-id", "client_secret": "web-secret"}}"#,
        )
        .unwrap();
        assert_eq!(secrets.client_id, "web-id");
    }

    #[test]
    fn test_secret_is_optional() {
        let secrets =
            ClientSecrets::from_json(r#"{"installed": {"client_id": "public-id"}}"#).unwrap();
        assert_eq!(secrets.client_id, "public-id");
        assert!(secrets.client_secret.is_none());
    }

    #[test]
    fn test_missing_section_rejected() {
        let result = ClientSecrets::from_json("{}");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = ClientSecrets::from_file("/nonexistent/credentials.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_token_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        assert!(store.load().unwrap().is_none());

        let token = Token::new("access123", "Bearer").with_refresh_token("refresh456");
        store.save(&token).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "access123");
        assert_eq!(loaded.refresh_token.as_deref(), Some("refresh456"));
    }

    #[test]
    fn test_token_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested/state/token.json"));
        store.save(&Token::new("access123", "Bearer")).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_token_store_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, "not json").unwrap();

        let store = TokenStore::new(path);
        assert!(store.load().unwrap().is_none());
    }
}
