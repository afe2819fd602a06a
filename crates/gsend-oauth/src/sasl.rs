//! SASL XOAUTH2 mechanism (Google proprietary).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Builds the raw XOAUTH2 initial client response.
///
/// Format: `user=<user>\x01auth=Bearer <token>\x01\x01`
///
/// This is the unencoded form; IMAP and SMTP libraries that drive the
/// SASL exchange themselves apply the Base64 encoding.
#[must_use]
pub fn xoauth2_initial_response(user: &str, token: &str) -> String {
    format!("user={user}\x01auth=Bearer {token}\x01\x01")
}

/// Builds the Base64-encoded XOAUTH2 response.
///
/// This is the wire form sent with `AUTH XOAUTH2` when speaking the
/// protocol directly.
///
/// # Example
///
/// ```
/// use gsend_oauth::sasl::xoauth2_response;
///
/// let response = xoauth2_response("user@example.com", "ya29.a0...");
/// // Can be used with IMAP AUTHENTICATE XOAUTH2 or SMTP AUTH XOAUTH2
/// ```
#[must_use]
pub fn xoauth2_response(user: &str, token: &str) -> String {
    STANDARD.encode(xoauth2_initial_response(user, token).as_bytes())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_xoauth2_initial_response_format() {
        let response = xoauth2_initial_response("test@test.com", "abc");
        assert_eq!(response, "user=test@test.com\x01auth=Bearer abc\x01\x01");
    }

    #[test]
    fn test_xoauth2_response() {
        let response = xoauth2_response("user@example.com", "token123");
        let decoded = STANDARD.decode(&response).unwrap();
        let decoded_str = String::from_utf8(decoded).unwrap();

        assert!(decoded_str.starts_with("user=user@example.com"));
        assert!(decoded_str.contains("auth=Bearer token123"));
        assert!(decoded_str.ends_with("\x01\x01"));
    }

    #[test]
    fn test_response_is_base64() {
        let response = xoauth2_response("user@example.com", "token");
        // Should not contain raw text, only base64 characters
        assert!(!response.contains("user@example.com"));
        assert!(!response.contains("token"));
        assert!(STANDARD.decode(&response).is_ok());
    }
}
