//! Orchestrates one send: validate, encode the attachment, acquire a token,
//! post to Graph, and report the outcome to a status sink.

pub mod error;
pub mod outcome;
pub mod runner;
pub mod status;

pub use error::DispatchError;
pub use outcome::{DispatchOutcome, DispatchPhase};
pub use runner::{MailDispatcher, OutgoingEmail};
pub use status::{
    BroadcastStatus, DispatchStatus, NoopStatus, StatusEvent, StatusSink, StatusSlots,
    SENDING_MESSAGE,
};
