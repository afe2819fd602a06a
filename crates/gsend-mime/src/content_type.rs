//! Content type lookup for attachment files.

use std::path::Path;

/// Fallback MIME type for unrecognized file extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Returns the MIME type for a file extension.
///
/// The lookup is case-insensitive. Unrecognized extensions map to
/// `application/octet-stream`.
#[must_use]
pub fn mime_type_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "doc" | "docx" => "application/msword",
        "xls" | "xlsx" => "application/vnd.ms-excel",
        "txt" => "text/plain",
        "zip" => "application/zip",
        _ => OCTET_STREAM,
    }
}

/// Returns the MIME type for a file path based on its extension.
///
/// Paths without an extension map to `application/octet-stream`.
#[must_use]
pub fn mime_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(OCTET_STREAM, mime_type_for_extension)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_type_for_extension("jpg"), "image/jpeg");
        assert_eq!(mime_type_for_extension("jpeg"), "image/jpeg");
        assert_eq!(mime_type_for_extension("png"), "image/png");
        assert_eq!(mime_type_for_extension("gif"), "image/gif");
        assert_eq!(mime_type_for_extension("pdf"), "application/pdf");
        assert_eq!(mime_type_for_extension("txt"), "text/plain");
        assert_eq!(mime_type_for_extension("zip"), "application/zip");
    }

    #[test]
    fn test_office_extensions() {
        assert_eq!(mime_type_for_extension("doc"), "application/msword");
        assert_eq!(mime_type_for_extension("docx"), "application/msword");
        assert_eq!(mime_type_for_extension("xls"), "application/vnd.ms-excel");
        assert_eq!(mime_type_for_extension("xlsx"), "application/vnd.ms-excel");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(mime_type_for_extension("PDF"), "application/pdf");
        assert_eq!(mime_type_for_extension("Jpg"), "image/jpeg");
        assert_eq!(mime_type_for_extension("DOCX"), "application/msword");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(mime_type_for_extension("mkv"), "application/octet-stream");
        assert_eq!(mime_type_for_extension(""), "application/octet-stream");
    }

    #[test]
    fn test_path_lookup() {
        assert_eq!(mime_type_for_path(Path::new("report.PDF")), "application/pdf");
        assert_eq!(mime_type_for_path(Path::new("/tmp/photo.jpeg")), "image/jpeg");
        assert_eq!(mime_type_for_path(Path::new("archive.tar.gz")), "application/octet-stream");
        assert_eq!(mime_type_for_path(Path::new("Makefile")), "application/octet-stream");
    }
}
