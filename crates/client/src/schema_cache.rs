//! Introspected schema caching.
//!
//! The cache is a single JSON file holding the server's raw introspection
//! response. Its existence alone decides whether the schema is read from disk
//! or fetched: there is no expiry. [`SchemaCache::refresh`] and
//! [`SchemaCache::clear`] are the only ways to replace or drop an artifact.

use crate::{Endpoint, GraphQLRequest, SchemaResolutionError, Transport, TransportRequest};
use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use graphql_util_introspect::{
    introspection_to_sdl, parse_introspection, IntrospectionResponse,
    IntrospectionSchema, INTROSPECTION_OPERATION_NAME, INTROSPECTION_QUERY,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Source name given to the rendered SDL in schema diagnostics.
const SCHEMA_SOURCE_NAME: &str = "schema.graphql";

type Result<T> = std::result::Result<T, SchemaResolutionError>;

/// A schema ready for validating documents.
///
/// Holds the decoded introspection result, the SDL rendered from it, and the
/// validated schema built from that SDL.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    introspection: IntrospectionResponse,
    sdl: String,
    schema: Valid<Schema>,
}

impl ResolvedSchema {
    /// Builds a schema from an introspection result.
    ///
    /// Returns the schema diagnostics as a message when the rendered SDL does
    /// not validate.
    pub fn from_introspection(
        introspection: IntrospectionResponse,
    ) -> std::result::Result<Self, String> {
        let sdl = introspection_to_sdl(&introspection);
        let schema = Schema::parse_and_validate(sdl.as_str(), SCHEMA_SOURCE_NAME)
            .map_err(|invalid| invalid.errors.to_string())?;
        Ok(Self {
            introspection,
            sdl,
            schema,
        })
    }

    #[must_use]
    pub fn schema(&self) -> &Valid<Schema> {
        &self.schema
    }

    #[must_use]
    pub fn sdl(&self) -> &str {
        &self.sdl
    }

    #[must_use]
    pub fn introspection(&self) -> &IntrospectionSchema {
        &self.introspection.data.schema
    }

    /// Enum types keyed by lower-cased name, each with its value names.
    /// `__`-prefixed introspection enums are left out.
    #[must_use]
    pub fn enums(&self) -> BTreeMap<String, Vec<String>> {
        self.introspection().enums()
    }
}

/// Location of one schema artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCache {
    path: PathBuf,
}

impl SchemaCache {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Returns the cached schema, introspecting `endpoint` only when no
    /// artifact exists yet.
    ///
    /// A fetched schema is validated before anything is written, and the
    /// artifact is created atomically, so a failed fetch leaves no file behind.
    #[tracing::instrument(skip(self, endpoint, transport), fields(path = %self.path.display()))]
    pub fn resolve(&self, endpoint: &Endpoint, transport: &dyn Transport) -> Result<ResolvedSchema> {
        if self.exists() {
            tracing::debug!("Using cached schema");
            return self.load();
        }

        tracing::info!(url = endpoint.url(), "No cached schema, introspecting");
        let (raw, schema) = fetch(endpoint, transport)?;
        self.persist(&raw, false)?;
        Ok(schema)
    }

    /// Reads the artifact without touching the network.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<ResolvedSchema> {
        let contents = fs::read_to_string(&self.path).map_err(|source| SchemaResolutionError::Io {
            path: self.path.clone(),
            source,
        })?;
        let corrupt = |message: String| SchemaResolutionError::Corrupt {
            path: self.path.clone(),
            message,
        };

        let raw: Value = serde_json::from_str(&contents).map_err(|e| corrupt(e.to_string()))?;
        let introspection = parse_introspection(&raw).map_err(|e| corrupt(e.to_string()))?;
        let schema = ResolvedSchema::from_introspection(introspection).map_err(corrupt)?;

        tracing::debug!(types = schema.introspection().types.len(), "Loaded cached schema");
        Ok(schema)
    }

    /// Introspects `endpoint` and replaces the artifact, existing or not.
    #[tracing::instrument(skip(self, endpoint, transport), fields(path = %self.path.display()))]
    pub fn refresh(&self, endpoint: &Endpoint, transport: &dyn Transport) -> Result<ResolvedSchema> {
        tracing::info!(url = endpoint.url(), "Refreshing cached schema");
        let (raw, schema) = fetch(endpoint, transport)?;
        self.persist(&raw, true)?;
        Ok(schema)
    }

    /// Deletes the artifact. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool> {
        if !self.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path).map_err(|source| SchemaResolutionError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), "Removed cached schema");
        Ok(true)
    }

    fn persist(&self, raw: &Value, overwrite: bool) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| SchemaResolutionError::Io { path, source }
        };

        fs::create_dir_all(dir).map_err(io_error(dir))?;

        let mut file = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
        serde_json::to_writer_pretty(&mut file, raw)
            .map_err(std::io::Error::from)
            .and_then(|()| file.write_all(b"\n"))
            .and_then(|()| file.as_file().sync_all())
            .map_err(io_error(file.path()))?;

        let persisted = if overwrite {
            file.persist(&self.path)
        } else {
            file.persist_noclobber(&self.path)
        };
        persisted.map_err(|e| SchemaResolutionError::Io {
            path: self.path.clone(),
            source: e.error,
        })?;

        tracing::debug!(path = %self.path.display(), "Cached schema");
        Ok(())
    }
}

/// Resolves the schema for `endpoint` using the artifact at `cache_path`.
pub fn resolve(
    endpoint: &Endpoint,
    cache_path: impl Into<PathBuf>,
    transport: &dyn Transport,
) -> Result<ResolvedSchema> {
    SchemaCache::new(cache_path).resolve(endpoint, transport)
}

fn fetch(endpoint: &Endpoint, transport: &dyn Transport) -> Result<(Value, ResolvedSchema)> {
    let request = TransportRequest {
        body: GraphQLRequest::new(INTROSPECTION_QUERY)
            .with_operation_name(Some(INTROSPECTION_OPERATION_NAME)),
        headers: endpoint.headers(),
        timeout: None,
    };

    let raw = transport
        .send(&request)
        .map_err(SchemaResolutionError::Introspection)?;

    let introspection = parse_introspection(&raw)
        .map_err(|e| SchemaResolutionError::InvalidIntrospection(e.to_string()))?;
    let schema = ResolvedSchema::from_introspection(introspection)
        .map_err(SchemaResolutionError::InvalidIntrospection)?;

    tracing::info!(
        types = schema.introspection().types.len(),
        directives = schema.introspection().directives.len(),
        "Introspection successful"
    );
    Ok((raw, schema))
}
