//! Errors raised by the individual mail components.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// The attachment file could not be read.
#[derive(Error, Debug)]
pub enum AttachmentError {
    #[error("failed to read attachment '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The token endpoint did not yield a usable access token.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("token request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("token endpoint returned {status}")]
    Rejected { status: StatusCode },

    #[error("token response is not valid JSON: {0}")]
    InvalidResponse(String),

    /// `access_token` absent, null, empty or not a string.
    #[error("token response has no access_token")]
    MissingAccessToken,
}

/// The Graph sendMail call failed.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("sendMail request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Graph API error: {status} {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("failed to serialize sendMail payload: {0}")]
    Serialize(#[from] serde_json::Error),
}
