//! Shared schema and document fixtures.
//!
//! The schema is served the way a real server would: as a raw introspection
//! response. Use it when a test needs a realistic schema but does not care
//! about its exact shape; prefer inline fixtures when the shape is the point
//! of the test.
//!
//! ```graphql
//! type Query {
//!   viewer: User!
//!   user(id: ID!): User
//! }
//!
//! type Mutation {
//!   updateName(name: String!): User
//! }
//!
//! type User {
//!   id: ID!
//!   name: String
//!   role: Role!
//! }
//!
//! enum Role {
//!   ADMIN
//!   MEMBER
//! }
//! ```

use serde_json::{json, Value};

pub const ENDPOINT: &str = "https://api.example.com/graphql";

pub const VIEWER_QUERY: &str = "query Viewer { viewer { id name } }";

pub const USER_QUERY: &str = "query GetUser($id: ID!) { user(id: $id) { id name role } }";

pub const UPDATE_NAME_MUTATION: &str =
    "mutation UpdateName($name: String!) { updateName(name: $name) { id name } }";

/// Query that does not validate: `email` is not a field of `User`.
pub const INVALID_QUERY: &str = "query Broken { viewer { email } }";

/// Introspection response for the fixture schema.
pub fn introspection_response() -> Value {
    json!({
        "data": {
            "__schema": {
                "queryType": { "name": "Query" },
                "mutationType": { "name": "Mutation" },
                "subscriptionType": null,
                "types": [
                    object("Query", &[
                        field("viewer", non_null(named("OBJECT", "User")), &[]),
                        field("user", named("OBJECT", "User"), &[
                            argument("id", non_null(named("SCALAR", "ID"))),
                        ]),
                    ]),
                    object("Mutation", &[
                        field("updateName", named("OBJECT", "User"), &[
                            argument("name", non_null(named("SCALAR", "String"))),
                        ]),
                    ]),
                    object("User", &[
                        field("id", non_null(named("SCALAR", "ID")), &[]),
                        field("name", named("SCALAR", "String"), &[]),
                        field("role", non_null(named("ENUM", "Role")), &[]),
                    ]),
                    enumeration("Role", &["ADMIN", "MEMBER"]),
                    enumeration("__TypeKind", &["SCALAR", "OBJECT"]),
                    scalar("ID"),
                    scalar("String"),
                    scalar("Boolean"),
                ],
                "directives": [{
                    "name": "include",
                    "description": null,
                    "locations": ["FIELD", "FRAGMENT_SPREAD", "INLINE_FRAGMENT"],
                    "args": [argument("if", non_null(named("SCALAR", "Boolean")))]
                }]
            }
        }
    })
}

/// SDL the fixture introspection renders to.
pub const SCHEMA_SDL: &str = "\
type Query {
  viewer: User!
  user(id: ID!): User
}

type Mutation {
  updateName(name: String!): User
}

type User {
  id: ID!
  name: String
  role: Role!
}

enum Role {
  ADMIN
  MEMBER
}";

fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name, "ofType": null })
}

fn non_null(inner: Value) -> Value {
    json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
}

fn argument(name: &str, type_ref: Value) -> Value {
    json!({ "name": name, "description": null, "type": type_ref, "defaultValue": null })
}

fn field(name: &str, type_ref: Value, args: &[Value]) -> Value {
    json!({
        "name": name,
        "description": null,
        "args": args,
        "type": type_ref,
        "isDeprecated": false,
        "deprecationReason": null
    })
}

fn object(name: &str, fields: &[Value]) -> Value {
    json!({
        "kind": "OBJECT",
        "name": name,
        "description": null,
        "fields": fields,
        "inputFields": null,
        "interfaces": [],
        "enumValues": null,
        "possibleTypes": null
    })
}

fn enumeration(name: &str, values: &[&str]) -> Value {
    let values: Vec<Value> = values
        .iter()
        .map(|value| {
            json!({
                "name": value,
                "description": null,
                "isDeprecated": false,
                "deprecationReason": null
            })
        })
        .collect();
    json!({
        "kind": "ENUM",
        "name": name,
        "description": null,
        "fields": null,
        "inputFields": null,
        "interfaces": null,
        "enumValues": values,
        "possibleTypes": null
    })
}

fn scalar(name: &str) -> Value {
    json!({
        "kind": "SCALAR",
        "name": name,
        "description": null,
        "fields": null,
        "inputFields": null,
        "interfaces": null,
        "enumValues": null,
        "possibleTypes": null
    })
}
