//! Keeps sensitive data out of logs and span attributes.

use std::path::Path;

/// Remote error bodies longer than this are cut before logging.
pub const MAX_ERROR_BODY_LENGTH: usize = 200;

/// File name only; attachment paths can reveal home directory layouts.
pub fn redact_path(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => "<unnamed>".to_string(),
    }
}

/// Cuts a response body to [`MAX_ERROR_BODY_LENGTH`] characters.
pub fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_LENGTH) {
        Some((cut, _)) => format!("{}... (truncated)", &body[..cut]),
        None => body.to_string(),
    }
}
