use crate::{
    ConfigurationError, Endpoint, ExecutionResult, GraphQLRequest, HttpTransport, OperationEntry,
    OperationRegistry, ParsedDocument, QueryParseError, ResolvedSchema, Result, SchemaCache,
    Transport, TransportRequest, Variables,
};
use graphql_util_config::TargetConfig;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Source name given to documents passed to [`Client::parse`].
const AD_HOC_SOURCE_NAME: &str = "document.graphql";

/// Per-request settings that travel alongside the variables.
///
/// Headers are added on top of the endpoint's default headers and replace any
/// default with the same name. Nothing here is ever sent as a variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub headers: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What to execute: a registered operation name or an already parsed document.
#[derive(Debug, Clone, Copy)]
pub enum Document<'a> {
    Named(&'a str),
    Parsed(&'a ParsedDocument),
}

impl<'a> From<&'a str> for Document<'a> {
    fn from(name: &'a str) -> Self {
        Self::Named(name)
    }
}

impl<'a> From<&'a String> for Document<'a> {
    fn from(name: &'a String) -> Self {
        Self::Named(name)
    }
}

impl<'a> From<&'a ParsedDocument> for Document<'a> {
    fn from(document: &'a ParsedDocument) -> Self {
        Self::Parsed(document)
    }
}

impl<'a> From<&'a OperationEntry> for Document<'a> {
    fn from(entry: &'a OperationEntry) -> Self {
        Self::Parsed(entry.document())
    }
}

/// A configured GraphQL client for one endpoint.
///
/// Configuring resolves the schema (from the cache file, or by introspection
/// when there is none) and registers every query file. The result is
/// immutable: executing operations never touches the schema or the registry.
///
/// ```no_run
/// use graphql_util::{Client, RequestContext, TargetConfig, Variables};
///
/// let config = TargetConfig::new("https://api.example.com/graphql", "graphql")
///     .with_token("secret");
/// let client = Client::configure(&config)?;
///
/// let result = client.call("viewer", &Variables::new(), &RequestContext::new());
/// if let Some(data) = result.data() {
///     println!("{data}");
/// }
/// # Ok::<(), graphql_util::Error>(())
/// ```
pub struct Client {
    endpoint: Endpoint,
    schema_cache: SchemaCache,
    schema: ResolvedSchema,
    operations: OperationRegistry,
    transport: Box<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("schema_cache", &self.schema_cache)
            .field("operations", &self.operations.len())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Configures a client talking HTTP to the target's endpoint.
    pub fn configure(config: &TargetConfig) -> Result<Self> {
        let endpoint = validated_endpoint(config)?;
        let transport = HttpTransport::from_config(&endpoint, config)
            .map_err(ConfigurationError::Transport)?;
        Self::build(endpoint, config, Box::new(transport))
    }

    /// Configures a client sending every request through `transport`.
    pub fn configure_with_transport(
        config: &TargetConfig,
        transport: impl Transport + 'static,
    ) -> Result<Self> {
        let endpoint = validated_endpoint(config)?;
        Self::build(endpoint, config, Box::new(transport))
    }

    #[tracing::instrument(skip_all, fields(endpoint = endpoint.url()))]
    fn build(endpoint: Endpoint, config: &TargetConfig, transport: Box<dyn Transport>) -> Result<Self> {
        let schema_cache = SchemaCache::new(config.schema_path());
        let schema = schema_cache.resolve(&endpoint, &*transport)?;
        let operations = OperationRegistry::build(&schema, &config.queries_dir())?;

        tracing::info!(operations = operations.len(), "Client configured");
        Ok(Self {
            endpoint,
            schema_cache,
            schema,
            operations,
            transport,
        })
    }

    /// Parses an ad-hoc document against this client's schema.
    pub fn parse(&self, source: impl Into<String>) -> std::result::Result<ParsedDocument, QueryParseError> {
        ParsedDocument::parse(&self.schema, source, AD_HOC_SOURCE_NAME)
    }

    /// Executes a registered operation or a parsed document.
    ///
    /// Never fails: unknown names, GraphQL errors and transport problems are
    /// all reported through the returned [`ExecutionResult`].
    pub fn query<'a>(
        &self,
        document: impl Into<Document<'a>>,
        variables: &Variables,
        context: &RequestContext,
    ) -> ExecutionResult {
        let document = match document.into() {
            Document::Parsed(document) => document,
            Document::Named(name) => match self.operations.get(name) {
                Some(entry) => entry.document(),
                None => {
                    let suggestion = self.operations.suggest(name);
                    tracing::warn!(name, ?suggestion, "Unknown operation");
                    return ExecutionResult::operation_not_found(name, suggestion);
                }
            },
        };
        self.execute(document, variables, context)
    }

    /// Executes the registered operation `name`.
    pub fn call(&self, name: &str, variables: &Variables, context: &RequestContext) -> ExecutionResult {
        self.query(Document::Named(name), variables, context)
    }

    /// A handle bound to the registered operation `name`.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<Operation<'_>> {
        self.operations.get(name).map(|entry| Operation { client: self, entry })
    }

    #[tracing::instrument(skip_all, fields(path = %document.path().display(), operation = ?document.operation_name()))]
    fn execute(&self, document: &ParsedDocument, variables: &Variables, context: &RequestContext) -> ExecutionResult {
        let mut headers = self.endpoint.headers();
        headers.retain(|name, _| {
            !context
                .headers
                .keys()
                .any(|override_name| override_name.eq_ignore_ascii_case(name))
        });
        headers.extend(context.headers.clone());

        let request = TransportRequest {
            body: GraphQLRequest::new(document.source())
                .with_variables(variables.clone())
                .with_operation_name(document.operation_name()),
            headers,
            timeout: context.timeout,
        };

        match self.transport.send(&request) {
            Ok(response) => {
                let result = ExecutionResult::from_response(response);
                tracing::debug!(success = result.is_success(), "Operation executed");
                result
            }
            Err(error) => {
                tracing::warn!(%error, "Transport failure");
                ExecutionResult::TransportFailure { error }
            }
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    #[must_use]
    pub fn schema(&self) -> &ResolvedSchema {
        &self.schema
    }

    #[must_use]
    pub fn schema_cache(&self) -> &SchemaCache {
        &self.schema_cache
    }

    #[must_use]
    pub fn operations(&self) -> &OperationRegistry {
        &self.operations
    }

    /// Enum types of the schema keyed by lower-cased name.
    ///
    /// Built-in introspection enums such as `__TypeKind` are not included.
    #[must_use]
    pub fn enums(&self) -> BTreeMap<String, Vec<String>> {
        self.schema.enums()
    }
}

/// Checks the target before anything touches the filesystem or network.
fn validated_endpoint(config: &TargetConfig) -> std::result::Result<Endpoint, ConfigurationError> {
    config
        .validate()
        .map_err(|reason| ConfigurationError::InvalidTarget {
            endpoint: config.endpoint.clone(),
            reason,
        })?;
    Endpoint::from_config(config)
}

/// A registered operation bound to its client.
#[derive(Debug, Clone, Copy)]
pub struct Operation<'a> {
    client: &'a Client,
    entry: &'a OperationEntry,
}

impl<'a> Operation<'a> {
    #[must_use]
    pub fn entry(&self) -> &'a OperationEntry {
        self.entry
    }

    pub fn call(&self, variables: &Variables, context: &RequestContext) -> ExecutionResult {
        self.client.execute(self.entry.document(), variables, context)
    }
}
