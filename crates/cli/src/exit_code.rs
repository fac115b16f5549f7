//! Exit codes for the graphql-util CLI.
//!
//! Scripts can tell a server that answered with GraphQL errors apart from one
//! that could not be reached, and both apart from a broken setup.

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no errors
    Success = 0,
    /// The server answered with GraphQL errors, or the operation is unknown
    OperationFailed = 1,
    /// No GraphQL response was obtained (network or HTTP failure)
    TransportFailed = 2,
    /// Configuration error (missing or invalid config, bad query files)
    ConfigError = 3,
    /// Schema could not be resolved (introspection failed, corrupt cache)
    SchemaError = 4,
}

impl ExitCode {
    /// Get the numeric value of this exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Exit code for an error that stopped a command.
    #[must_use]
    pub fn for_error(error: &anyhow::Error) -> Self {
        let schema_error = error.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<graphql_util::Error>(),
                Some(graphql_util::Error::SchemaResolution(_))
            ) || cause.is::<graphql_util::SchemaResolutionError>()
        });
        if schema_error {
            Self::SchemaError
        } else {
            Self::ConfigError
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(u8::try_from(code.code()).unwrap_or(u8::MAX))
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::OperationFailed => write!(f, "operation failed"),
            Self::TransportFailed => write!(f, "transport failure"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::SchemaError => write!(f, "schema error"),
        }
    }
}
