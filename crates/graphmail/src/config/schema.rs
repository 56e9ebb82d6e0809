use serde::Deserialize;

use super::settings::DEFAULT_GRANT_TYPE;

/// On-disk configuration document (`config.json`).
///
/// Client ID and secret each accept an inline value, a file, or an
/// environment variable; see [`crate::secrets::resolve_secret`].
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub version: String,
    pub token_endpoint: String,

    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_id_file: Option<String>,
    #[serde(default)]
    pub client_id_env_var: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub client_secret_file: Option<String>,
    #[serde(default)]
    pub client_secret_env_var: Option<String>,

    pub scope: String,
    #[serde(default = "default_grant_type")]
    pub grant_type: String,
    pub sender_email_address: String,

    #[serde(default)]
    pub graph_base_url: Option<String>,
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub attachment_base_dir: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_grant_type() -> String {
    DEFAULT_GRANT_TYPE.to_string()
}
