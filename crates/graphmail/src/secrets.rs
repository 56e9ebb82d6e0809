//! Resolution of OAuth client credentials from configuration.
//!
//! A credential can be supplied in three ways, checked in this order:
//!
//! 1. **Inline value** in the config file (`clientSecret: "..."`)
//! 2. **File reference**, e.g. a mounted secret (`clientSecretFile: /run/secrets/graph`)
//! 3. **Environment variable** (`clientSecretEnvVar: GRAPH_CLIENT_SECRET`)

use std::path::PathBuf;

use secrecy::SecretString;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("no value, file or environment variable configured")]
    NoSource,

    #[error("cannot read credential file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("environment variable '{0}' is not set")]
    EnvVarMissing(String),

    #[error("environment variable '{0}' is not valid unicode")]
    EnvVarNotUnicode(String),

    /// The source resolved, but to an empty string after trimming.
    #[error("credential resolved to an empty value")]
    Empty,
}

pub type Result<T> = std::result::Result<T, SecretError>;

/// Where a credential comes from. Empty strings count as "not configured".
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretSource<'a> {
    pub value: Option<&'a str>,
    pub file: Option<&'a str>,
    pub env_var: Option<&'a str>,
}

impl<'a> SecretSource<'a> {
    pub fn new(value: Option<&'a str>, file: Option<&'a str>, env_var: Option<&'a str>) -> Self {
        Self {
            value: value.filter(|v| !v.is_empty()),
            file: file.filter(|f| !f.is_empty()),
            env_var: env_var.filter(|e| !e.is_empty()),
        }
    }

    /// Reads the credential from the highest-priority configured source.
    ///
    /// File contents and environment values are trimmed, so a trailing
    /// newline in a mounted secret does not reach the token request.
    pub fn resolve(&self) -> Result<SecretString> {
        let raw = if let Some(value) = self.value {
            value.to_string()
        } else if let Some(file) = self.file {
            let path = PathBuf::from(expand_home(file));
            std::fs::read_to_string(&path)
                .map_err(|source| SecretError::FileRead { path, source })?
                .trim()
                .to_string()
        } else if let Some(name) = self.env_var {
            match std::env::var(name) {
                Ok(value) => value.trim().to_string(),
                Err(std::env::VarError::NotPresent) => {
                    return Err(SecretError::EnvVarMissing(name.to_string()))
                }
                Err(std::env::VarError::NotUnicode(_)) => {
                    return Err(SecretError::EnvVarNotUnicode(name.to_string()))
                }
            }
        } else {
            return Err(SecretError::NoSource);
        };

        if raw.is_empty() {
            return Err(SecretError::Empty);
        }
        Ok(SecretString::from(raw))
    }
}

/// Shorthand for `SecretSource::new(value, file, env_var).resolve()`.
pub fn resolve_secret(
    value: Option<&str>,
    file: Option<&str>,
    env_var: Option<&str>,
) -> Result<SecretString> {
    SecretSource::new(value, file, env_var).resolve()
}

/// Expands a leading `~` using HOME, falling back to USERPROFILE.
pub(crate) fn expand_home(path: &str) -> String {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return path.to_string(),
    };
    match std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        Some(home) => format!("{}{}", home.to_string_lossy(), rest),
        None => path.to_string(),
    }
}
