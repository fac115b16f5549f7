use crate::TransportError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Anything that stops a client from being built.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] graphql_util_config::ConfigError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    SchemaResolution(#[from] SchemaResolutionError),

    #[error(transparent)]
    QueryParse(#[from] QueryParseError),
}

/// The client was set up with inputs that can never work.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Target '{target}' is already configured")]
    AlreadyConfigured { target: String },

    #[error("Invalid file {} found: expected file extension to be .graphql", file.display())]
    InvalidExtension { file: PathBuf },

    #[error("Invalid operation name '{name}' derived from {}: expected letters, digits and underscores, not starting with a digit", file.display())]
    InvalidOperationName { file: PathBuf, name: String },

    #[error("Operation name collision on '{name}': {} and {}", first.display(), second.display())]
    NameCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Failed to read queries directory {}: {source}", path.display())]
    QueriesDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid target configuration for '{endpoint}': {reason}")]
    InvalidTarget { endpoint: String, reason: String },

    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to create transport: {0}")]
    Transport(#[source] TransportError),
}

/// No usable schema could be produced.
#[derive(Debug, Error)]
pub enum SchemaResolutionError {
    #[error("Corrupt schema cache {}: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },

    #[error("Introspection request failed: {0}")]
    Introspection(#[source] TransportError),

    #[error("Introspection response rejected: {0}")]
    InvalidIntrospection(String),

    #[error("Schema cache I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A query document did not parse or validate against the schema.
#[derive(Debug, Error)]
#[error("Failed to parse {}: {message}", file.display())]
pub struct QueryParseError {
    pub file: PathBuf,
    pub message: String,
}

impl QueryParseError {
    pub(crate) fn new(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
        }
    }
}
