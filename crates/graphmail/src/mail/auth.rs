//! OAuth2 client-credentials token exchange.
//!
//! One POST per call, no caching and no refresh: every send fetches a fresh
//! token.

use std::fmt;

use log::{debug, error, info};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use super::error::AuthError;
use crate::config::OAuthCredentials;

/// A bearer token issued by the token endpoint.
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// The raw token, for the `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Performs the client-credentials exchange against a token endpoint.
pub struct TokenClient {
    client: Client,
}

impl TokenClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Requests a token with `client_id`, `client_secret`, `scope` and
    /// `grant_type` as a form-encoded body.
    ///
    /// A non-success status fails without reading the body.
    pub async fn fetch_token(&self, creds: &OAuthCredentials) -> Result<AccessToken, AuthError> {
        info!("Requesting access token from {}", creds.token_endpoint());

        let response = self
            .client
            .post(creds.token_endpoint().clone())
            .form(&creds.form_params())
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            error!("Token request failed with status {}", status);
            return Err(AuthError::Rejected { status });
        }

        let body = response.text().await.map_err(AuthError::Transport)?;
        let token = extract_access_token(&body)?;

        debug!("Access token received ({} chars)", token.expose().len());
        Ok(token)
    }
}

/// Pulls `access_token` out of a token endpoint response body.
fn extract_access_token(body: &str) -> Result<AccessToken, AuthError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

    // Numeric tokens are taken as their decimal text.
    let token = match json.get("access_token") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    if token.is_empty() {
        error!("Token response did not contain an access_token");
        return Err(AuthError::MissingAccessToken);
    }
    Ok(AccessToken::new(token))
}
