//! Transfer encoding utilities.
//!
//! Supports Base64 body encoding with RFC 2045 line wrapping and the
//! web-safe Base64 variant used by the Gmail REST API.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

/// Maximum line length for Base64 body encoding.
const MAX_LINE_LENGTH: usize = 76;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Encodes data as Base64 wrapped at 76 characters per line (RFC 2045).
///
/// Every line, including the last, is terminated with CRLF. Empty input
/// produces an empty string.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut wrapped = String::with_capacity(encoded.len() + 2 * encoded.len().div_ceil(MAX_LINE_LENGTH));
    let mut rest = encoded.as_str();

    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(MAX_LINE_LENGTH));
        wrapped.push_str(line);
        wrapped.push_str("\r\n");
        rest = tail;
    }

    wrapped
}

/// Encodes data using the URL-safe Base64 alphabet without padding.
///
/// This is the "web-safe" form the Gmail REST API expects for the `raw`
/// message field: `+` becomes `-`, `/` becomes `_`, and trailing `=`
/// padding is omitted.
#[must_use]
pub fn encode_base64url(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes URL-safe unpadded Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid URL-safe Base64.
pub fn decode_base64url(data: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(data).map_err(Into::into)
}
