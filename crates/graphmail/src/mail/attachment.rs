//! Reading and base64-encoding a file attachment.

use std::fmt;
use std::path::Path;

use base64::Engine;
use log::debug;

use super::error::AttachmentError;
use super::mime::resolve_mime_type;

/// Name used when the path has no final component (e.g. `/`).
const FALLBACK_ATTACHMENT_NAME: &str = "attachment";

/// A file attachment ready to be embedded in a sendMail payload.
#[derive(Clone, PartialEq, Eq)]
pub struct AttachmentDescriptor {
    /// Display name, taken from the final path segment.
    pub name: String,
    pub content_type: String,
    pub base64_content: String,
}

impl AttachmentDescriptor {
    /// Builds a descriptor from in-memory content.
    pub fn from_bytes(name: impl Into<String>, content: &[u8]) -> Self {
        let name = name.into();
        let content_type = resolve_mime_type(&name).to_string();
        Self {
            base64_content: base64::engine::general_purpose::STANDARD.encode(content),
            content_type,
            name,
        }
    }
}

// Content can be megabytes of base64; only its length is useful in logs.
impl fmt::Debug for AttachmentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentDescriptor")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("base64_len", &self.base64_content.len())
            .finish()
    }
}

/// Reads the whole file and encodes it.
///
/// There is no size limit: the file is loaded into memory in one piece.
/// The path is not checked for existence first; a missing file surfaces as
/// [`AttachmentError::Read`].
pub async fn encode_attachment(path: &Path) -> Result<AttachmentDescriptor, AttachmentError> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|source| AttachmentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_ATTACHMENT_NAME.to_string());

    let descriptor = AttachmentDescriptor::from_bytes(name, &content);

    debug!(
        "Encoded attachment '{}' ({} bytes, {})",
        descriptor.name,
        content.len(),
        descriptor.content_type
    );

    Ok(descriptor)
}
