//! Components of a single mail dispatch: content typing, attachment
//! encoding, the OAuth2 token exchange, and the Graph sendMail payload.

pub mod attachment;
pub mod auth;
pub mod error;
pub mod graph;
pub mod mime;
pub mod payload;

pub use attachment::{encode_attachment, AttachmentDescriptor};
pub use auth::{AccessToken, TokenClient};
pub use error::{AttachmentError, AuthError, SendError};
pub use graph::{create_http_client, post_send_mail};
pub use mime::{resolve_mime_type, DEFAULT_MIME_TYPE};
pub use payload::{build_payload, EmailMessage, SendMailRequest};
