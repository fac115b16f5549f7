use crate::TransportError;
use serde_json::{json, Map, Value};

/// Error code carried by the problem reported for an unknown operation.
pub const OPERATION_NOT_FOUND: &str = "OPERATION_NOT_FOUND";

/// Outcome of executing one operation.
///
/// GraphQL-level errors and infrastructure failures are kept apart: a server
/// that answered with `errors` produces [`ExecutionResult::Failure`], while a
/// request that never produced a GraphQL response produces
/// [`ExecutionResult::TransportFailure`].
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    Success {
        data: Value,
    },
    Failure {
        /// The `message` of every reported error.
        messages: Vec<String>,
        /// The error objects as reported, including locations, paths and extensions.
        problems: Vec<Value>,
        /// Partial data sent alongside the errors.
        data: Option<Value>,
    },
    TransportFailure {
        error: TransportError,
    },
}

impl ExecutionResult {
    /// Normalizes a raw GraphQL response.
    pub fn from_response(response: Value) -> Self {
        let Value::Object(mut response) = response else {
            return Self::malformed("response is not a JSON object");
        };

        let data = response.remove("data").filter(|data| !data.is_null());
        match response.remove("errors") {
            Some(Value::Array(errors)) if !errors.is_empty() => {
                let messages = errors.iter().map(error_message).collect();
                Self::Failure {
                    messages,
                    problems: errors,
                    data,
                }
            }
            Some(Value::Array(_) | Value::Null) | None => match data {
                Some(data) => Self::Success { data },
                None => Self::malformed("response contains neither data nor errors"),
            },
            Some(_) => Self::malformed("response errors are not a list"),
        }
    }

    /// Failure reported for a name that matches no registered operation.
    pub fn operation_not_found(name: &str, suggestion: Option<&str>) -> Self {
        let message = match suggestion {
            Some(suggestion) => {
                format!("operation not found: {name} (did you mean '{suggestion}'?)")
            }
            None => format!("operation not found: {name}"),
        };
        let problem = json!({
            "message": message,
            "extensions": { "code": OPERATION_NOT_FOUND, "operation": name },
        });
        Self::Failure {
            messages: vec![message],
            problems: vec![problem],
            data: None,
        }
    }

    fn malformed(reason: &str) -> Self {
        let message = format!("malformed GraphQL response: {reason}");
        Self::Failure {
            problems: vec![json!({ "message": message })],
            messages: vec![message],
            data: None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::TransportFailure { .. })
    }

    /// Data of a success, or partial data of a failure.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { data, .. } => data.as_ref(),
            Self::TransportFailure { .. } => None,
        }
    }

    /// Error messages; empty for a success.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Success { .. } => Vec::new(),
            Self::Failure { messages, .. } => messages.clone(),
            Self::TransportFailure { error } => vec![error.to_string()],
        }
    }

    /// Renders the outcome as a GraphQL-style JSON response.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        match self {
            Self::Success { data } => {
                out.insert("data".to_string(), data.clone());
            }
            Self::Failure { problems, data, .. } => {
                out.insert("errors".to_string(), Value::Array(problems.clone()));
                if let Some(data) = data {
                    out.insert("data".to_string(), data.clone());
                }
            }
            Self::TransportFailure { error } => {
                out.insert(
                    "errors".to_string(),
                    json!([{ "message": error.to_string(), "extensions": { "code": "TRANSPORT_ERROR" } }]),
                );
            }
        }
        Value::Object(out)
    }
}

impl From<TransportError> for ExecutionResult {
    fn from(error: TransportError) -> Self {
        Self::TransportFailure { error }
    }
}

fn error_message(error: &Value) -> String {
    match error.get("message").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None => error.to_string(),
    }
}
