//! The HTTP collaborator.
//!
//! [`Transport`] is the seam between the client and the network: it takes a
//! fully assembled request (body, headers, optional timeout) and returns the
//! raw JSON the server answered with. [`HttpTransport`] is the blocking
//! `reqwest` implementation used outside of tests.

use crate::Endpoint;
use graphql_util_config::TargetConfig;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Variables sent with an operation.
pub type Variables = serde_json::Map<String, Value>;

/// Default timeout for requests (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// JSON body of a GraphQL-over-HTTP POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub query: String,
    pub variables: Variables,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQLRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Variables::new(),
            operation_name: None,
        }
    }

    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    #[must_use]
    pub fn with_operation_name(mut self, name: Option<impl Into<String>>) -> Self {
        self.operation_name = name.map(Into::into);
        self
    }
}

/// Everything a transport needs to perform one request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub body: GraphQLRequest,
    /// Final header set; later sources have already overridden earlier ones.
    pub headers: BTreeMap<String, String>,
    /// Per-request timeout overriding the transport's default.
    pub timeout: Option<Duration>,
}

/// A failure to obtain a GraphQL response at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    #[error("Failed to parse response body: {0}")]
    Parse(String),
}

impl TransportError {
    /// Network errors and 5xx server errors are retryable.
    /// Parse errors and 4xx client errors are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http(status, _) => *status >= 500,
            Self::Parse(_) => false,
        }
    }
}

/// Sends GraphQL requests and returns the decoded JSON response.
///
/// Implementations own connection handling, timeouts and any retry policy.
/// A response carrying GraphQL `errors` is still a successful send.
pub trait Transport: Send + Sync {
    fn send(&self, request: &TransportRequest) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &TransportRequest) -> Result<Value, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &TransportRequest) -> Result<Value, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &TransportRequest) -> Result<Value, TransportError> {
        (**self).send(request)
    }
}

/// Blocking HTTP transport posting JSON to a single endpoint.
///
/// ```no_run
/// use graphql_util::{GraphQLRequest, HttpTransport, Transport, TransportRequest};
/// use std::time::Duration;
///
/// let transport = HttpTransport::builder("https://api.example.com/graphql")
///     .with_timeout(Duration::from_secs(60))
///     .with_retries(2)
///     .build()?;
///
/// let response = transport.send(&TransportRequest {
///     body: GraphQLRequest::new("{ viewer { id } }"),
///     headers: Default::default(),
///     timeout: None,
/// })?;
/// # Ok::<(), graphql_util::TransportError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: String,
    client: reqwest::blocking::Client,
    headers: BTreeMap<String, String>,
    retries: u32,
}

/// Builder for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    url: String,
    headers: BTreeMap<String, String>,
    timeout: Duration,
    connect_timeout: Duration,
    retries: u32,
}

impl HttpTransportBuilder {
    /// Adds a header sent with every request. Per-request headers win on conflict.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the request timeout (connection + transfer). Default is 30 seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout. Default is 10 seconds.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the number of retry attempts on retryable failures.
    ///
    /// Retries use exponential backoff starting at 1 second.
    /// Default is 0 (no retries).
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn build(self) -> Result<HttpTransport, TransportError> {
        tracing::debug!(url = %self.url, "Creating HTTP client with timeouts");
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(HttpTransport {
            url: self.url,
            client,
            headers: self.headers,
            retries: self.retries,
        })
    }
}

impl HttpTransport {
    #[must_use]
    pub fn builder(url: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            retries: 0,
        }
    }

    /// Builds a transport posting to the validated `endpoint` URL with the
    /// target's timeouts and retry count.
    pub fn from_config(endpoint: &Endpoint, config: &TargetConfig) -> Result<Self, TransportError> {
        Self::builder(endpoint.url())
            .with_timeout(config.timeout())
            .with_connect_timeout(config.connect_timeout())
            .with_retries(config.retries())
            .build()
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn send_once(&self, request: &TransportRequest) -> Result<Value, TransportError> {
        let mut builder = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");

        for (name, value) in merge_headers(&self.headers, &request.headers) {
            builder = builder.header(name, value);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .json(&request.body)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Received response");
        let body = response
            .text()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            // GraphQL-over-HTTP servers may answer 4xx with a regular error payload.
            if let Some(payload) = graphql_error_payload(&body) {
                tracing::debug!(status = status.as_u16(), "Non-2xx response carries GraphQL errors");
                return Ok(payload);
            }
            tracing::error!(status = status.as_u16(), body = %body, "HTTP error response");
            return Err(TransportError::Http(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse response body");
            TransportError::Parse(e.to_string())
        })
    }
}

impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, request), fields(url = %self.url, operation = ?request.body.operation_name))]
    fn send(&self, request: &TransportRequest) -> Result<Value, TransportError> {
        let mut last_error = None;
        let attempts = self.retries + 1;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(6)); // 1s, 2s, 4s, ...
                tracing::info!(
                    attempt,
                    delay_secs = delay.as_secs(),
                    "Retrying after delay"
                );
                std::thread::sleep(delay);
            }

            match self.send_once(request) {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Request failed");
                    let retryable = e.is_retryable();
                    last_error = Some(e);
                    if !retryable {
                        break;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| TransportError::Network("No attempts made".to_string())))
    }
}

/// Request headers replace transport headers with the same (case-insensitive) name.
fn merge_headers<'a>(
    defaults: &'a BTreeMap<String, String>,
    overrides: &'a BTreeMap<String, String>,
) -> Vec<(&'a str, &'a str)> {
    defaults
        .iter()
        .filter(|(name, _)| !overrides.keys().any(|o| o.eq_ignore_ascii_case(name)))
        .chain(overrides)
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect()
}

fn graphql_error_payload(body: &str) -> Option<Value> {
    let value: Value = serde_json::from_str(body).ok()?;
    let has_errors = value
        .get("errors")
        .and_then(Value::as_array)
        .is_some_and(|errors| !errors.is_empty());
    has_errors.then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let builder = HttpTransport::builder("https://api.example.com/graphql");
        assert!(builder.headers.is_empty());
        assert_eq!(builder.timeout, Duration::from_secs(30));
        assert_eq!(builder.connect_timeout, Duration::from_secs(10));
        assert_eq!(builder.retries, 0);
    }

    #[test]
    fn test_builder_settings() {
        let builder = HttpTransport::builder("https://api.example.com/graphql")
            .with_header("X-API-Key", "key123")
            .with_timeout(Duration::from_secs(60))
            .with_retries(3);

        assert_eq!(builder.headers.get("X-API-Key"), Some(&"key123".to_string()));
        assert_eq!(builder.timeout, Duration::from_secs(60));
        assert_eq!(builder.retries, 3);
    }

    #[test]
    fn test_from_config() {
        let config = TargetConfig::new("https://api.example.com/graphql", "graphql").with_retry(2);
        let endpoint = Endpoint::from_config(&config).unwrap();
        let transport = HttpTransport::from_config(&endpoint, &config).unwrap();
        assert_eq!(transport.url(), "https://api.example.com/graphql");
        assert_eq!(transport.retries, 2);
    }

    #[test]
    fn test_from_config_posts_to_trimmed_endpoint() {
        let config = TargetConfig::new("  https://api.example.com/graphql\n", "graphql");
        let endpoint = Endpoint::from_config(&config).unwrap();
        let transport = HttpTransport::from_config(&endpoint, &config).unwrap();
        assert_eq!(transport.url(), "https://api.example.com/graphql");
    }

    #[test]
    fn test_is_retryable() {
        assert!(TransportError::Network("timeout".into()).is_retryable());
        assert!(TransportError::Http(500, "error".into()).is_retryable());
        assert!(TransportError::Http(503, "error".into()).is_retryable());
        assert!(!TransportError::Http(401, "error".into()).is_retryable());
        assert!(!TransportError::Http(404, "error".into()).is_retryable());
        assert!(!TransportError::Parse("error".into()).is_retryable());
    }

    #[test]
    fn test_request_body_shape() {
        let mut variables = Variables::new();
        variables.insert("id".to_string(), json!("1"));
        let body = GraphQLRequest::new("query User($id: ID!) { user(id: $id) { id } }")
            .with_variables(variables)
            .with_operation_name(Some("User"));

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "query": "query User($id: ID!) { user(id: $id) { id } }",
                "variables": { "id": "1" },
                "operationName": "User"
            })
        );

        let anonymous = GraphQLRequest::new("{ viewer { id } }").with_operation_name(None::<String>);
        assert_eq!(
            serde_json::to_value(&anonymous).unwrap(),
            json!({ "query": "{ viewer { id } }", "variables": {} })
        );
    }

    #[test]
    fn test_merge_headers() {
        let defaults = BTreeMap::from([
            ("X-API-Key".to_string(), "key123".to_string()),
            ("User-Agent".to_string(), "default".to_string()),
        ]);
        let overrides = BTreeMap::from([("user-agent".to_string(), "custom".to_string())]);

        assert_eq!(
            merge_headers(&defaults, &overrides),
            vec![("X-API-Key", "key123"), ("user-agent", "custom")]
        );
    }

    #[test]
    fn test_graphql_error_payload() {
        assert!(graphql_error_payload(r#"{"errors":[{"message":"bad"}]}"#).is_some());
        assert!(graphql_error_payload(r#"{"errors":[]}"#).is_none());
        assert!(graphql_error_payload("<html>oops</html>").is_none());
    }
}
