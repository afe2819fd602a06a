//! Error types for MIME operations.

use std::path::PathBuf;

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required message field is empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// An attachment exists on disk but could not be read.
    #[error("Failed to read attachment {path}: {source}")]
    AttachmentRead {
        /// Path of the attachment that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
