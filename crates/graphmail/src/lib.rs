pub mod config;
pub mod dispatch;
pub mod error;
pub mod mail;
pub mod sanitize;
pub mod secrets;

pub use config::{load_config, load_config_from_str, MailerConfig, OAuthCredentials};
pub use dispatch::{
    BroadcastStatus, DispatchError, DispatchOutcome, DispatchPhase, DispatchStatus,
    MailDispatcher, NoopStatus, OutgoingEmail, StatusEvent, StatusSink, StatusSlots,
};
pub use error::{ConfigError, Result};
pub use mail::{AttachmentDescriptor, AttachmentError, AuthError, SendError};
pub use secrets::{resolve_secret, SecretError, SecretSource};
