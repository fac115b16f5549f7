//! GraphQL introspection model and SDL rendering.
//!
//! This crate knows what an introspection result looks like. It does not talk
//! to the network: callers send [`INTROSPECTION_QUERY`] through whatever
//! transport they own and hand the raw JSON back to [`parse_introspection`].
//!
//! # Example
//!
//! ```
//! use graphql_util_introspect::{introspection_to_sdl, parse_introspection};
//!
//! let raw = serde_json::json!({
//!     "data": { "__schema": {
//!         "queryType": { "name": "Query" },
//!         "mutationType": null,
//!         "subscriptionType": null,
//!         "types": [{
//!             "kind": "OBJECT",
//!             "name": "Query",
//!             "description": null,
//!             "fields": [{
//!                 "name": "hello",
//!                 "description": null,
//!                 "args": [],
//!                 "type": { "kind": "SCALAR", "name": "String", "ofType": null },
//!                 "isDeprecated": false,
//!                 "deprecationReason": null
//!             }],
//!             "interfaces": []
//!         }],
//!         "directives": []
//!     } }
//! });
//!
//! let introspection = parse_introspection(&raw).unwrap();
//! assert_eq!(introspection_to_sdl(&introspection), "type Query {\n  hello: String\n}");
//! ```

mod error;
mod query;
mod sdl;
mod types;

pub use error::{IntrospectionError, Result};
pub use query::{parse_introspection, INTROSPECTION_OPERATION_NAME, INTROSPECTION_QUERY};
pub use sdl::{introspection_to_sdl, Sdl};
pub use types::*;
