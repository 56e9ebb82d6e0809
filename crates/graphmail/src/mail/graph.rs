//! HTTP plumbing shared by the token exchange and the sendMail call.

use std::time::Duration;

use log::{info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::auth::AccessToken;
use super::error::SendError;
use super::payload::SendMailRequest;
use crate::sanitize;

/// Connect timeout for both endpoints.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Creates the HTTP client used for one send.
///
/// Without `request_timeout` a hung endpoint blocks the send indefinitely.
pub fn create_http_client(request_timeout: Option<Duration>) -> reqwest::Result<Client> {
    let mut builder = Client::builder().connect_timeout(DEFAULT_CONNECT_TIMEOUT);
    if let Some(timeout) = request_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// POSTs a sendMail body with the bearer token.
///
/// Any 2xx is success; Graph normally answers `202 Accepted` with no body.
pub async fn post_send_mail(
    client: &Client,
    url: &str,
    token: &AccessToken,
    payload: &SendMailRequest<'_>,
) -> Result<(), SendError> {
    let body = serde_json::to_string(payload)?;

    let response = client
        .post(url)
        .bearer_auth(token.expose())
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(SendError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("sendMail rejected with {}; reading the body failed: {}", status, e);
                return Err(SendError::Transport(e));
            }
        };
        warn!(
            "sendMail rejected with {}: {}",
            status,
            sanitize::truncate_body(&body)
        );
        return Err(SendError::Rejected { status, body });
    }

    info!("sendMail accepted with {}", status);
    Ok(())
}
