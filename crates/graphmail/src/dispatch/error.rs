use thiserror::Error;

use crate::mail::{AttachmentError, AuthError, SendError};

/// Why a dispatch failed. `Display` is the message reported to the status sink.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Recipient, subject or body was empty. Nothing was sent over the network.
    #[error("Missing email parameters.")]
    MissingParameters,

    #[error("Error sending email: {0}")]
    AttachmentRead(#[from] AttachmentError),

    /// The token endpoint answered with a non-success status, or with JSON
    /// lacking a usable `access_token`. The mail endpoint was not contacted.
    #[error("Failed to retrieve access token.")]
    Auth(#[source] AuthError),

    #[error("Graph API error: {status} {body}")]
    Send {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Error sending email: {0}")]
    Unexpected(String),
}

impl DispatchError {
    /// Short category name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::MissingParameters => "validation",
            DispatchError::AttachmentRead(_) => "attachment_read",
            DispatchError::Auth(_) => "auth",
            DispatchError::Send { .. } => "send",
            DispatchError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<AuthError> for DispatchError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Transport(e) => DispatchError::Unexpected(e.to_string()),
            AuthError::InvalidResponse(reason) => DispatchError::Unexpected(reason),
            other => DispatchError::Auth(other),
        }
    }
}

impl From<SendError> for DispatchError {
    fn from(err: SendError) -> Self {
        match err {
            SendError::Rejected { status, body } => DispatchError::Send { status, body },
            other => DispatchError::Unexpected(other.to_string()),
        }
    }
}
