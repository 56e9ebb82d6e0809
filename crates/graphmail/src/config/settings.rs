//! Validated runtime configuration for the mail dispatcher.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{ConfigError, Result};
use crate::secrets::expand_home;

/// Graph API root used when no override is configured.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Grant type requested from the token endpoint unless configured otherwise.
pub const DEFAULT_GRANT_TYPE: &str = "client_credentials";

/// Credentials for the OAuth2 client-credentials exchange.
///
/// All fields are checked at construction; a value of this type is always
/// usable for a token request.
#[derive(Debug)]
pub struct OAuthCredentials {
    token_endpoint: Url,
    client_id: String,
    client_secret: SecretString,
    scope: String,
    grant_type: String,
}

impl OAuthCredentials {
    pub fn new(
        token_endpoint: impl AsRef<str>,
        client_id: impl Into<String>,
        client_secret: SecretString,
        scope: impl Into<String>,
        grant_type: impl Into<String>,
    ) -> Result<Self> {
        let token_endpoint = parse_http_url("tokenEndpoint", token_endpoint.as_ref())?;
        let client_id = non_empty("clientId", client_id.into())?;
        if client_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::missing("clientSecret"));
        }
        let scope = non_empty("scope", scope.into())?;
        let grant_type = non_empty("grantType", grant_type.into())?;

        Ok(Self {
            token_endpoint,
            client_id,
            client_secret,
            scope,
            grant_type,
        })
    }

    pub fn token_endpoint(&self) -> &Url {
        &self.token_endpoint
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn grant_type(&self) -> &str {
        &self.grant_type
    }

    /// Form fields for the token request, values passed through verbatim.
    pub(crate) fn form_params(&self) -> [(&'static str, &str); 4] {
        [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("scope", self.scope.as_str()),
            ("grant_type", self.grant_type.as_str()),
        ]
    }
}

/// Everything the dispatcher needs, supplied once by the host.
#[derive(Debug)]
pub struct MailerConfig {
    credentials: OAuthCredentials,
    sender_address: String,
    graph_base_url: Url,
    attachment: Option<PathBuf>,
    attachment_base_dir: Option<PathBuf>,
    request_timeout: Option<Duration>,
}

impl MailerConfig {
    pub fn new(credentials: OAuthCredentials, sender_address: impl Into<String>) -> Result<Self> {
        let sender_address = non_empty("senderEmailAddress", sender_address.into())?;
        let graph_base_url = parse_http_url("graphBaseUrl", DEFAULT_GRAPH_BASE_URL)?;

        Ok(Self {
            credentials,
            sender_address,
            graph_base_url,
            attachment: None,
            attachment_base_dir: None,
            request_timeout: None,
        })
    }

    /// Overrides the Graph API root (e.g. a national cloud or a local mock).
    pub fn with_graph_base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.graph_base_url = parse_http_url("graphBaseUrl", url.as_ref())?;
        Ok(self)
    }

    /// Sets the initial attachment slot.
    #[must_use]
    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachment = Some(path.into());
        self
    }

    /// Directory that relative attachment paths are resolved against.
    #[must_use]
    pub fn with_attachment_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.attachment_base_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn credentials(&self) -> &OAuthCredentials {
        &self.credentials
    }

    pub fn sender_address(&self) -> &str {
        &self.sender_address
    }

    pub fn graph_base_url(&self) -> &Url {
        &self.graph_base_url
    }

    pub fn attachment(&self) -> Option<&Path> {
        self.attachment.as_deref()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// `{graphBaseUrl}/users/{senderEmailAddress}/sendMail`
    pub fn send_mail_url(&self) -> String {
        format!(
            "{}/users/{}/sendMail",
            self.graph_base_url.as_str().trim_end_matches('/'),
            self.sender_address
        )
    }

    /// Expands `~` and anchors relative paths at the attachment base directory.
    pub fn resolve_attachment_path(&self, raw: &Path) -> PathBuf {
        let expanded = PathBuf::from(expand_home(&raw.to_string_lossy()));
        match &self.attachment_base_dir {
            Some(base) if expanded.is_relative() => base.join(expanded),
            _ => expanded,
        }
    }
}

fn non_empty(field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(ConfigError::missing(field));
    }
    Ok(value)
}

fn parse_http_url(field: &'static str, raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(ConfigError::missing(field));
    }

    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        field,
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            field,
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
