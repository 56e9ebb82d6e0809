use std::path::Path;
use std::time::Duration;

use secrecy::ExposeSecret;

use crate::config::schema::ConfigFile;
use crate::config::settings::{MailerConfig, OAuthCredentials};
use crate::error::ConfigError;
use crate::secrets::resolve_secret;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MailerConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<MailerConfig, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let file: ConfigFile = serde_json::from_value(json_value)?;

    build_config(file)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let errors: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !errors.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: errors.join("; "),
        });
    }

    Ok(())
}

fn build_config(file: ConfigFile) -> Result<MailerConfig, ConfigError> {
    if file.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", file.version),
        });
    }

    let client_id = resolve_secret(
        file.client_id.as_deref(),
        file.client_id_file.as_deref(),
        file.client_id_env_var.as_deref(),
    )
    .map_err(|source| ConfigError::Secret {
        field: "clientId",
        source,
    })?;

    if file.client_secret.is_some() {
        log::warn!(
            "Using an inline clientSecret is not recommended. \
             Consider clientSecretFile or clientSecretEnvVar instead."
        );
    }
    let client_secret = resolve_secret(
        file.client_secret.as_deref(),
        file.client_secret_file.as_deref(),
        file.client_secret_env_var.as_deref(),
    )
    .map_err(|source| ConfigError::Secret {
        field: "clientSecret",
        source,
    })?;

    let credentials = OAuthCredentials::new(
        &file.token_endpoint,
        client_id.expose_secret(),
        client_secret,
        file.scope,
        file.grant_type,
    )?;

    let mut config = MailerConfig::new(credentials, file.sender_email_address)?;

    if let Some(url) = file.graph_base_url {
        config = config.with_graph_base_url(url)?;
    }
    if let Some(dir) = file.attachment_base_dir.filter(|d| !d.is_empty()) {
        config = config.with_attachment_base_dir(dir);
    }
    if let Some(attachment) = file.attachment.filter(|a| !a.is_empty()) {
        config = config.with_attachment(attachment);
    }
    if let Some(secs) = file.request_timeout_secs {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }

    Ok(config)
}
