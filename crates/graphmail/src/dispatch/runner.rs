use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use futures_util::FutureExt;
use tracing::{debug, error, info, info_span, Instrument, Span};
use uuid::Uuid;

use super::error::DispatchError;
use super::outcome::{DispatchOutcome, DispatchPhase};
use super::status::{DispatchStatus, StatusSink};
use crate::config::MailerConfig;
use crate::mail::{
    build_payload, create_http_client, encode_attachment, post_send_mail, EmailMessage,
    TokenClient,
};
use crate::sanitize;

/// One message to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    /// An empty path is treated as no attachment.
    pub attachment: Option<PathBuf>,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachment = Some(path.into());
        self
    }

    fn has_all_parameters(&self) -> bool {
        !self.to.is_empty() && !self.subject.is_empty() && !self.body.is_empty()
    }
}

/// Sends mail through Microsoft Graph and reports the result to a status sink.
///
/// Every send fetches a fresh access token and builds its own HTTP client.
/// Nothing is cached between sends, so concurrent sends share no state
/// apart from the status sink and the attachment slot.
pub struct MailDispatcher {
    config: Arc<MailerConfig>,
    status: Arc<dyn StatusSink>,
    attachment: RwLock<Option<PathBuf>>,
}

impl MailDispatcher {
    /// Creates a dispatcher and resets the sink to `(false, "")`.
    ///
    /// The attachment slot starts out with the configured attachment, if any.
    pub fn new(config: Arc<MailerConfig>, status: Arc<dyn StatusSink>) -> Self {
        debug!(phase = %DispatchPhase::Idle, "Resetting status");
        publish(status.as_ref(), &DispatchStatus::idle());
        let attachment = config.attachment().map(Path::to_path_buf);
        Self {
            config,
            status,
            attachment: RwLock::new(attachment),
        }
    }

    pub fn config(&self) -> &MailerConfig {
        &self.config
    }

    /// Replaces the attachment used by [`send_email`](Self::send_email).
    pub fn set_attachment(&self, path: Option<PathBuf>) {
        let mut slot = match self.attachment.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = path;
    }

    pub fn attachment(&self) -> Option<PathBuf> {
        match self.attachment.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Sends a message using the current attachment slot.
    pub async fn send_email(&self, to: &str, subject: &str, body: &str) -> DispatchOutcome {
        let email = OutgoingEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            attachment: self.attachment(),
        };
        self.send(email).await
    }

    /// Runs one send to completion.
    ///
    /// The sink sees `(false, "Sending email...")` first and then exactly one
    /// terminal update matching the returned outcome. Failures never escape
    /// as errors or panics, including panics raised by the status sink.
    pub async fn send(&self, email: OutgoingEmail) -> DispatchOutcome {
        let dispatch_id = Uuid::new_v4();
        let attachment_name = email
            .attachment
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .map(sanitize::redact_path)
            .unwrap_or_else(|| "none".to_string());
        let span = info_span!("dispatch",
            dispatch_id = %dispatch_id,
            attachment = %attachment_name,
        );

        let to = email.to.clone();
        let outcome = self.supervise(&to, span, self.run(email)).await;
        debug!(dispatch_id = %dispatch_id, phase = %outcome.phase(), "Dispatch finished");
        outcome
    }

    /// Brackets one send attempt with status updates and turns its result,
    /// panics included, into the outcome.
    async fn supervise<F>(&self, to: &str, span: Span, attempt: F) -> DispatchOutcome
    where
        F: Future<Output = Result<(), DispatchError>>,
    {
        publish(self.status.as_ref(), &DispatchStatus::sending());

        let result = AssertUnwindSafe(attempt.instrument(span.clone()))
            .catch_unwind()
            .await;

        let outcome = span.in_scope(|| match result {
            Ok(Ok(())) => {
                info!("Email sent to {}", to);
                DispatchOutcome::success(format!("Email sent successfully to {}", to))
            }
            Ok(Err(e)) => {
                error!(kind = e.kind(), "Dispatch failed: {}", e);
                DispatchOutcome::failure(e.to_string())
            }
            Err(panic) => {
                let e = DispatchError::Unexpected(panic_message(panic.as_ref()));
                error!(kind = e.kind(), "Dispatch panicked: {}", e);
                DispatchOutcome::failure(e.to_string())
            }
        });

        publish(self.status.as_ref(), &DispatchStatus::from(&outcome));
        outcome
    }

    async fn run(&self, email: OutgoingEmail) -> Result<(), DispatchError> {
        debug!(phase = %DispatchPhase::Validating, "Entering phase");
        if !email.has_all_parameters() {
            error!("Missing parameters in send request");
            return Err(DispatchError::MissingParameters);
        }

        let attachment = match email.attachment.as_deref() {
            Some(raw) if !raw.as_os_str().is_empty() => {
                debug!(phase = %DispatchPhase::EncodingAttachment, "Entering phase");
                let path = self.config.resolve_attachment_path(raw);
                let descriptor = encode_attachment(&path)
                    .instrument(info_span!("encode_attachment",
                        file = %sanitize::redact_path(&path),
                    ))
                    .await?;
                Some(descriptor)
            }
            _ => None,
        };

        let client = create_http_client(self.config.request_timeout())
            .map_err(|e| DispatchError::Unexpected(e.to_string()))?;

        debug!(phase = %DispatchPhase::AcquiringToken, "Entering phase");
        let token = TokenClient::new(client.clone())
            .fetch_token(self.config.credentials())
            .instrument(info_span!("acquire_token"))
            .await?;

        debug!(phase = %DispatchPhase::Sending, "Entering phase");
        let message = EmailMessage {
            to: email.to,
            subject: email.subject,
            body_text: email.body,
            attachment,
        };
        let payload = build_payload(&message);
        let url = self.config.send_mail_url();
        post_send_mail(&client, &url, &token, &payload)
            .instrument(info_span!("send_mail"))
            .await?;

        Ok(())
    }
}

/// Hands a status to the sink; a panicking sink is logged and ignored.
fn publish(sink: &dyn StatusSink, status: &DispatchStatus) {
    if std::panic::catch_unwind(AssertUnwindSafe(|| sink.update(status))).is_err() {
        error!("Status sink panicked while recording '{}'", status.message);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
