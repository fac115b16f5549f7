//! Introspection query text and response decoding.

use crate::{IntrospectionError, IntrospectionResponse, Result};
use serde::Deserialize;
use serde_json::Value;

/// Operation name sent alongside [`INTROSPECTION_QUERY`].
pub const INTROSPECTION_OPERATION_NAME: &str = "IntrospectionQuery";

/// Standard GraphQL introspection query.
///
/// Fetches root operation types, every named type with its fields, arguments,
/// input fields, interfaces, enum values and possible types, and all directive
/// definitions. Type references are unwrapped up to seven levels so wrappers
/// like `[[[String!]!]!]` survive the round trip.
pub const INTROSPECTION_QUERY: &str = r"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      ...FullType
    }
    directives {
      name
      description
      locations
      args {
        ...InputValue
      }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type {
    ...TypeRef
  }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
";

/// Decodes a raw GraphQL response to the introspection query.
///
/// The raw value is what a server returned for [`INTROSPECTION_QUERY`]; it is
/// also the exact content of a cached schema artifact.
///
/// # Errors
///
/// - [`IntrospectionError::Rejected`] when the response carries GraphQL errors
/// - [`IntrospectionError::Invalid`] when `data.__schema` is missing
/// - [`IntrospectionError::Parse`] when the schema does not match the
///   introspection shape
#[tracing::instrument(skip(raw))]
pub fn parse_introspection(raw: &Value) -> Result<IntrospectionResponse> {
    let Some(object) = raw.as_object() else {
        return Err(IntrospectionError::Invalid(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    if let Some(errors) = object.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let messages = errors
                .iter()
                .map(|error| {
                    error
                        .get("message")
                        .and_then(Value::as_str)
                        .map_or_else(|| error.to_string(), str::to_string)
                })
                .collect::<Vec<_>>();
            tracing::warn!(errors = messages.len(), "Introspection returned errors");
            return Err(IntrospectionError::Rejected(messages));
        }
    }

    let has_schema = object
        .get("data")
        .and_then(|data| data.get("__schema"))
        .is_some_and(|schema| !schema.is_null());
    if !has_schema {
        return Err(IntrospectionError::Invalid(
            "response has no data.__schema field".to_string(),
        ));
    }

    let response = IntrospectionResponse::deserialize(raw)
        .map_err(|e| IntrospectionError::Parse(e.to_string()))?;

    tracing::debug!(
        types = response.data.schema.types.len(),
        directives = response.data.schema.directives.len(),
        "Decoded introspection response"
    );
    Ok(response)
}
