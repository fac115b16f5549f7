use thiserror::Error;

pub type Result<T> = std::result::Result<T, IntrospectionError>;

#[derive(Debug, Error)]
pub enum IntrospectionError {
    /// The server answered the introspection query with GraphQL errors.
    #[error("Introspection rejected by server: {}", .0.join("; "))]
    Rejected(Vec<String>),

    #[error("Failed to parse introspection response: {0}")]
    Parse(String),

    #[error("Invalid introspection response: {0}")]
    Invalid(String),
}
