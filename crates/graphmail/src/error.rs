use std::path::PathBuf;
use thiserror::Error;

use crate::secrets::SecretError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid URL for '{field}' ({url}): {reason}")]
    InvalidUrl {
        field: &'static str,
        url: String,
        reason: String,
    },

    #[error("Failed to resolve '{field}': {source}")]
    Secret {
        field: &'static str,
        #[source]
        source: SecretError,
    },
}

impl ConfigError {
    pub(crate) fn missing(field: &str) -> Self {
        ConfigError::Validation {
            message: format!("'{}' must not be empty", field),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
