//! Configuration for graphql-util targets.
//!
//! A config file describes one endpoint (exposed as the `default` target) or a
//! `targets` map of named endpoints. YAML, JSON and TOML are accepted.

mod config;
mod error;
mod loader;

pub use config::{
    GraphQLUtilConfig, TargetConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_QUERIES_DIR,
    DEFAULT_SCHEMA_FILE, DEFAULT_TARGET, DEFAULT_TIMEOUT_SECS,
};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str};
