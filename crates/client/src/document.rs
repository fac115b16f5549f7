use crate::{QueryParseError, ResolvedSchema};
use apollo_compiler::executable::OperationType;
use apollo_compiler::validation::Valid;
use apollo_compiler::ExecutableDocument;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Kind of an executable operation.
///
/// Subscriptions are rejected at parse time, so only the two request/response
/// kinds exist here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Mutation => f.write_str("mutation"),
        }
    }
}

/// One GraphQL document holding exactly one operation, validated against a
/// schema.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    source: String,
    path: PathBuf,
    document: Valid<ExecutableDocument>,
    operation_name: Option<String>,
    kind: OperationKind,
}

impl ParsedDocument {
    /// Parses and validates `source`. `path` names the document in diagnostics.
    #[tracing::instrument(skip(schema, source), fields(path = %path.as_ref().display()))]
    pub fn parse(
        schema: &ResolvedSchema,
        source: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, QueryParseError> {
        let source = source.into();
        let path = path.as_ref();

        let document =
            ExecutableDocument::parse_and_validate(schema.schema(), source.as_str(), path)
                .map_err(|invalid| QueryParseError::new(path, invalid.errors.to_string()))?;

        let operations: Vec<_> = document.operations.iter().collect();
        let operation = match operations.as_slice() {
            [operation] => *operation,
            [] => return Err(QueryParseError::new(path, "document contains no operation")),
            many => {
                return Err(QueryParseError::new(
                    path,
                    format!(
                        "document contains {} operations, expected exactly one",
                        many.len()
                    ),
                ))
            }
        };

        let kind = match operation.operation_type {
            OperationType::Query => OperationKind::Query,
            OperationType::Mutation => OperationKind::Mutation,
            OperationType::Subscription => {
                return Err(QueryParseError::new(
                    path,
                    "subscriptions cannot be executed over HTTP",
                ))
            }
        };
        let operation_name = operation.name.as_ref().map(ToString::to_string);

        tracing::debug!(?kind, operation = ?operation_name, "Parsed document");
        Ok(Self {
            source,
            path: path.to_path_buf(),
            document,
            operation_name,
            kind,
        })
    }

    /// Reads the file at `path` in full and parses it.
    pub fn read(schema: &ResolvedSchema, path: &Path) -> Result<Self, QueryParseError> {
        let source = fs::read_to_string(path)
            .map_err(|e| QueryParseError::new(path, format!("failed to read file: {e}")))?;
        Self::parse(schema, source, path)
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn document(&self) -> &Valid<ExecutableDocument> {
        &self.document
    }

    /// Name of the operation, `None` for an anonymous one.
    #[must_use]
    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}
