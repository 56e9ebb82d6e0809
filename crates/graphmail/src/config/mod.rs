pub mod loader;
pub mod schema;
pub mod settings;

pub use loader::{load_config, load_config_from_str};
pub use schema::ConfigFile;
pub use settings::{MailerConfig, OAuthCredentials, DEFAULT_GRANT_TYPE, DEFAULT_GRAPH_BASE_URL};
