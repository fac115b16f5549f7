use crate::ConfigurationError;
use graphql_util_config::TargetConfig;
use std::collections::BTreeMap;

/// The remote GraphQL service a client talks to.
///
/// Fixed once a client is configured; its token and user agent become the
/// default headers of every request, including introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: reqwest::Url,
    token: Option<String>,
    user_agent: Option<String>,
}

impl Endpoint {
    /// Parses `url`, which must be an absolute `http` or `https` URL.
    pub fn new(url: &str) -> Result<Self, ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidEndpoint {
            endpoint: url.to_string(),
            reason,
        };
        let parsed = reqwest::Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }
        Ok(Self {
            url: parsed,
            token: None,
            user_agent: None,
        })
    }

    pub fn from_config(config: &TargetConfig) -> Result<Self, ConfigurationError> {
        let mut endpoint = Self::new(&config.endpoint)?;
        endpoint.token.clone_from(&config.token);
        endpoint.user_agent.clone_from(&config.user_agent);
        Ok(endpoint)
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Headers derived from the token and user agent.
    #[must_use]
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        if let Some(token) = &self.token {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }
        if let Some(user_agent) = &self.user_agent {
            headers.insert("User-Agent".to_string(), user_agent.clone());
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        let endpoint = Endpoint::new("https://api.example.com/graphql")
            .unwrap()
            .with_token("secret")
            .with_user_agent("example/1.0");

        let headers = endpoint.headers();
        assert_eq!(headers.get("Authorization").map(String::as_str), Some("Bearer secret"));
        assert_eq!(headers.get("User-Agent").map(String::as_str), Some("example/1.0"));
    }

    #[test]
    fn test_no_headers_without_credentials() {
        let endpoint = Endpoint::new("http://localhost:4000/graphql").unwrap();
        assert!(endpoint.headers().is_empty());
        assert_eq!(endpoint.url(), "http://localhost:4000/graphql");
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            Endpoint::new("not a url"),
            Err(ConfigurationError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            Endpoint::new("ftp://example.com/graphql"),
            Err(ConfigurationError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_from_config() {
        let config = TargetConfig::new("https://api.example.com/graphql", "graphql")
            .with_token("t")
            .with_user_agent("ua");
        let endpoint = Endpoint::from_config(&config).unwrap();
        assert_eq!(endpoint.token(), Some("t"));
        assert_eq!(endpoint.user_agent(), Some("ua"));
    }
}
