//! A GraphQL client assembled from a directory of query files.
//!
//! Configuring a [`Client`] for a target does three things, in order:
//!
//! 1. Resolves the schema. The introspection result is cached as JSON at the
//!    target's schema path; when that file is missing the endpoint is
//!    introspected once and the file is written. An existing file is always
//!    reused ([`SchemaCache`]).
//! 2. Parses every `.graphql` file of the target's queries directory against
//!    that schema and registers it under a name derived from the file name
//!    ([`OperationRegistry`]).
//! 3. Keeps the [`Transport`] used to send operations.
//!
//! Operations then run by name through [`Client::call`], or as ad-hoc
//! documents through [`Client::query`], and always produce an
//! [`ExecutionResult`].

mod client;
mod document;
mod endpoint;
mod error;
mod registry;
mod result;
mod schema_cache;
mod targets;
mod transport;

pub use client::{Client, Document, Operation, RequestContext};
pub use document::{OperationKind, ParsedDocument};
pub use endpoint::Endpoint;
pub use error::{ConfigurationError, Error, QueryParseError, Result, SchemaResolutionError};
pub use registry::{OperationEntry, OperationRegistry, QUERY_FILE_EXTENSION};
pub use result::{ExecutionResult, OPERATION_NOT_FOUND};
pub use schema_cache::{resolve, ResolvedSchema, SchemaCache};
pub use targets::Targets;
pub use transport::{
    GraphQLRequest, HttpTransport, HttpTransportBuilder, Transport, TransportError,
    TransportRequest, Variables,
};

pub use graphql_util_config::TargetConfig;
