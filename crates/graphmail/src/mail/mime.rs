use std::path::Path;

/// Content type used for anything outside the known table.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Maps a file's extension to the content type sent with the attachment.
///
/// Matching is case-insensitive. Unknown or missing extensions fall back to
/// [`DEFAULT_MIME_TYPE`]. A bare dotfile such as `.pdf` counts as having the
/// extension `pdf`.
pub fn resolve_mime_type(path: impl AsRef<Path>) -> &'static str {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .or_else(|| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_prefix('.'))
        })
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("txt") => "text/plain",
        Some("html" | "htm") => "text/html",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => DEFAULT_MIME_TYPE,
    }
}
