use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name under which a single-target configuration is exposed.
pub const DEFAULT_TARGET: &str = "default";

/// Schema artifact file name inside a target's `path`.
pub const DEFAULT_SCHEMA_FILE: &str = "schema.json";

/// Query documents directory name inside a target's `path`.
pub const DEFAULT_QUERIES_DIR: &str = "queries";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration.
/// Either a single target or multiple named targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphQLUtilConfig {
    /// Multi-target configuration
    Multi {
        targets: BTreeMap<String, TargetConfig>,
    },
    /// Single target configuration (boxed to reduce enum size)
    Single(Box<TargetConfig>),
}

impl GraphQLUtilConfig {
    /// Get all targets as an iterator, ordered by name.
    /// For single target configs, yields a single item named [`DEFAULT_TARGET`].
    #[must_use]
    pub fn targets(&self) -> Box<dyn Iterator<Item = (&str, &TargetConfig)> + '_> {
        match self {
            Self::Single(config) => Box::new(std::iter::once((DEFAULT_TARGET, config.as_ref()))),
            Self::Multi { targets } => Box::new(
                targets
                    .iter()
                    .map(|(name, config)| (name.as_str(), config)),
            ),
        }
    }

    /// Get a specific target by name.
    #[must_use]
    pub fn get_target(&self, name: &str) -> Option<&TargetConfig> {
        match self {
            Self::Single(config) if name == DEFAULT_TARGET => Some(config.as_ref()),
            Self::Single(_) => None,
            Self::Multi { targets } => targets.get(name),
        }
    }

    #[must_use]
    pub const fn is_multi_target(&self) -> bool {
        matches!(self, Self::Multi { .. })
    }

    #[must_use]
    pub fn target_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi { targets } => targets.len(),
        }
    }

    /// Target names, for "available targets" style messages.
    #[must_use]
    pub fn target_names(&self) -> Vec<&str> {
        self.targets().map(|(name, _)| name).collect()
    }

    /// Rebase every relative path against `base`.
    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        match self {
            Self::Single(config) => config.resolve_paths(base),
            Self::Multi { targets } => {
                for config in targets.values_mut() {
                    config.resolve_paths(base);
                }
            }
        }
    }
}

/// Configuration for one GraphQL endpoint.
///
/// ```yaml
/// endpoint: https://api.example.com/graphql
/// path: graphql/example      # holds queries/ and schema.json
/// token: secret              # sent as `Authorization: Bearer secret`
/// userAgent: my-app/1.0
/// timeout: 30
/// retry: 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfig {
    /// The GraphQL endpoint URL
    pub endpoint: String,

    /// Directory containing the `queries/` folder and the schema artifact
    pub path: PathBuf,

    /// Bearer token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// User-Agent header sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Connection timeout in seconds (default: 10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u64>,

    /// Number of retry attempts on retryable transport failures (default: 0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<u32>,

    /// Schema artifact location, overriding `<path>/schema.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,

    /// Query documents directory, overriding `<path>/queries`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queries: Option<PathBuf>,
}

impl TargetConfig {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            endpoint: endpoint.into(),
            path: path.into(),
            token: None,
            user_agent: None,
            timeout: None,
            connect_timeout: None,
            retry: None,
            schema: None,
            queries: None,
        }
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

    /// Sets the request timeout, rounded up to whole seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0));
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: u32) -> Self {
        self.retry = Some(retry);
        self
    }

    #[must_use]
    pub fn with_schema_path(mut self, schema: impl Into<PathBuf>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn with_queries_dir(mut self, queries: impl Into<PathBuf>) -> Self {
        self.queries = Some(queries.into());
        self
    }

    /// Where the introspection artifact is cached.
    #[must_use]
    pub fn schema_path(&self) -> PathBuf {
        self.schema
            .clone()
            .unwrap_or_else(|| self.path.join(DEFAULT_SCHEMA_FILE))
    }

    /// Directory holding one `.graphql` file per operation.
    #[must_use]
    pub fn queries_dir(&self) -> PathBuf {
        self.queries
            .clone()
            .unwrap_or_else(|| self.path.join(DEFAULT_QUERIES_DIR))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retry.unwrap_or(0)
    }

    /// Check the fields that can be verified without touching the network.
    ///
    /// Returns a human-readable description of the first problem found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(format!(
                "endpoint '{endpoint}' must be an http:// or https:// URL"
            ));
        }
        if self.path.as_os_str().is_empty() {
            return Err("path must not be empty".to_string());
        }
        if self.timeout == Some(0) {
            return Err("timeout must be greater than zero".to_string());
        }
        if self.connect_timeout == Some(0) {
            return Err("connectTimeout must be greater than zero".to_string());
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let rebase = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        rebase(&mut self.path);
        if let Some(schema) = self.schema.as_mut() {
            rebase(schema);
        }
        if let Some(queries) = self.queries.as_mut() {
            rebase(queries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_target_config() {
        let yaml = r"
endpoint: https://api.example.com/graphql
path: graphql
token: secret
userAgent: example/1.0
";
        let config: GraphQLUtilConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(!config.is_multi_target());
        assert_eq!(config.target_count(), 1);

        let target = config.get_target(DEFAULT_TARGET).unwrap();
        assert_eq!(target.endpoint, "https://api.example.com/graphql");
        assert_eq!(target.token.as_deref(), Some("secret"));
        assert_eq!(target.user_agent.as_deref(), Some("example/1.0"));
        assert!(config.get_target("other").is_none());
    }

    #[test]
    fn test_multi_target_config() {
        let yaml = r"
targets:
  github:
    endpoint: https://api.github.com/graphql
    path: graphql/github
  shop:
    endpoint: https://shop.example.com/graphql
    path: graphql/shop
    retry: 2
";
        let config: GraphQLUtilConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.is_multi_target());
        assert_eq!(config.target_names(), vec!["github", "shop"]);
        assert_eq!(config.get_target("shop").unwrap().retries(), 2);
        assert!(config.get_target(DEFAULT_TARGET).is_none());
    }

    #[test]
    fn test_derived_paths() {
        let target = TargetConfig::new("https://api.example.com/graphql", "graphql");
        assert_eq!(target.schema_path(), PathBuf::from("graphql/schema.json"));
        assert_eq!(target.queries_dir(), PathBuf::from("graphql/queries"));

        let target = target
            .with_schema_path("cache/schema.json")
            .with_queries_dir("ops");
        assert_eq!(target.schema_path(), PathBuf::from("cache/schema.json"));
        assert_eq!(target.queries_dir(), PathBuf::from("ops"));
    }

    #[test]
    fn test_defaults() {
        let target = TargetConfig::new("https://api.example.com/graphql", "graphql");
        assert_eq!(target.timeout(), Duration::from_secs(30));
        assert_eq!(target.connect_timeout(), Duration::from_secs(10));
        assert_eq!(target.retries(), 0);

        let target = target.with_timeout(Duration::from_secs(5)).with_retry(3);
        assert_eq!(target.timeout(), Duration::from_secs(5));
        assert_eq!(target.retries(), 3);
    }

    #[test]
    fn test_sub_second_timeout_rounds_up() {
        let target = TargetConfig::new("https://api.example.com/graphql", "graphql");
        assert_eq!(
            target.clone().with_timeout(Duration::from_millis(250)).timeout(),
            Duration::from_secs(1)
        );
        assert_eq!(
            target.clone().with_timeout(Duration::from_millis(1500)).timeout(),
            Duration::from_secs(2)
        );
        assert!(target.with_timeout(Duration::ZERO).validate().is_err());
    }

    #[test]
    fn test_validate() {
        assert!(TargetConfig::new("https://api.example.com/graphql", "graphql")
            .validate()
            .is_ok());
        assert!(TargetConfig::new("", "graphql").validate().is_err());
        assert!(TargetConfig::new("ftp://example.com", "graphql")
            .validate()
            .is_err());
        assert!(TargetConfig::new("https://api.example.com/graphql", "")
            .validate()
            .is_err());

        let mut zero_timeout = TargetConfig::new("https://api.example.com/graphql", "graphql");
        zero_timeout.timeout = Some(0);
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_resolve_paths_only_touches_relative() {
        let mut config = GraphQLUtilConfig::Single(Box::new(
            TargetConfig::new("https://api.example.com/graphql", "graphql")
                .with_schema_path("/var/cache/schema.json"),
        ));
        config.resolve_paths(Path::new("/project"));

        let target = config.get_target(DEFAULT_TARGET).unwrap();
        assert_eq!(target.path, PathBuf::from("/project/graphql"));
        assert_eq!(target.schema_path(), PathBuf::from("/var/cache/schema.json"));
        assert_eq!(target.queries_dir(), PathBuf::from("/project/graphql/queries"));
    }
}
