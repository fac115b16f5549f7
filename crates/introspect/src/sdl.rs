//! SDL rendering of introspection results.

use crate::types::{
    IntrospectionField, IntrospectionInputValue, IntrospectionResponse, IntrospectionSchema,
    IntrospectionType, IntrospectionTypeRef,
};
use std::fmt::{self, Display, Write};

/// Built-in scalars every GraphQL schema gets implicitly.
const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

/// Directives every GraphQL schema gets implicitly.
const BUILTIN_DIRECTIVES: &[&str] = &["skip", "include", "deprecated", "specifiedBy", "oneOf"];

/// Renders an introspection response as SDL.
///
/// Built-in scalars, built-in directives and `__`-prefixed meta types are left
/// out so the output can be fed straight back into a schema parser. A `schema`
/// block is only emitted when a root type uses a non-default name.
#[must_use]
#[tracing::instrument(skip(introspection), fields(
    types = introspection.data.schema.types.len(),
    directives = introspection.data.schema.directives.len()
))]
pub fn introspection_to_sdl(introspection: &IntrospectionResponse) -> String {
    let sdl = Sdl(&introspection.data.schema).to_string();
    tracing::debug!(sdl_length = sdl.len(), "SDL generation complete");
    sdl
}

/// Display adapter that writes a schema as SDL.
pub struct Sdl<'a>(pub &'a IntrospectionSchema);

impl Display for Sdl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.0;
        let mut blocks: Vec<String> = Vec::new();

        if needs_schema_definition(schema) {
            let mut block = String::from("schema {\n");
            write_root(&mut block, "query", schema.query_type.as_ref())?;
            write_root(&mut block, "mutation", schema.mutation_type.as_ref())?;
            write_root(&mut block, "subscription", schema.subscription_type.as_ref())?;
            block.push('}');
            blocks.push(block);
        }

        for directive in &schema.directives {
            if BUILTIN_DIRECTIVES.contains(&directive.name.as_str()) {
                continue;
            }
            let mut block = String::new();
            write_description(&mut block, directive.description.as_deref(), 0)?;
            write!(block, "directive @{}", directive.name)?;
            write_arguments(&mut block, &directive.args)?;
            write!(block, " on {}", directive.locations.join(" | "))?;
            blocks.push(block);
        }

        for type_def in &schema.types {
            let name = type_def.name();
            if type_def.is_introspection_type() || BUILTIN_SCALARS.contains(&name) {
                continue;
            }
            let mut block = String::new();
            write_type(&mut block, type_def)?;
            blocks.push(block);
        }

        write!(f, "{}", blocks.join("\n\n"))
    }
}

/// A `schema` block is needed when the roots differ from what the default
/// type names would imply, including a `Mutation` or `Subscription` type that
/// is not actually a root.
fn needs_schema_definition(schema: &IntrospectionSchema) -> bool {
    let implied_differently = |root: Option<&IntrospectionTypeRef>, default: &str| match root {
        Some(root) => root.name != default,
        None => schema.types.iter().any(|type_def| type_def.name() == default),
    };
    implied_differently(schema.query_type.as_ref(), "Query")
        || implied_differently(schema.mutation_type.as_ref(), "Mutation")
        || implied_differently(schema.subscription_type.as_ref(), "Subscription")
}

fn write_root(out: &mut String, operation: &str, root: Option<&IntrospectionTypeRef>) -> fmt::Result {
    match root {
        Some(root) => writeln!(out, "  {operation}: {}", root.name),
        None => Ok(()),
    }
}

fn write_type(out: &mut String, type_def: &IntrospectionType) -> fmt::Result {
    match type_def {
        IntrospectionType::Scalar(t) => {
            write_description(out, t.description.as_deref(), 0)?;
            write!(out, "scalar {}", t.name)
        }
        IntrospectionType::Object(t) => {
            write_description(out, t.description.as_deref(), 0)?;
            write!(out, "type {}", t.name)?;
            write_implements(out, &t.interfaces)?;
            write_fields(out, &t.fields)
        }
        IntrospectionType::Interface(t) => {
            write_description(out, t.description.as_deref(), 0)?;
            write!(out, "interface {}", t.name)?;
            write_implements(out, &t.interfaces)?;
            write_fields(out, &t.fields)
        }
        IntrospectionType::Union(t) => {
            write_description(out, t.description.as_deref(), 0)?;
            write!(out, "union {}", t.name)?;
            if !t.possible_types.is_empty() {
                let members: Vec<&str> = t.possible_types.iter().map(|m| m.name.as_str()).collect();
                write!(out, " = {}", members.join(" | "))?;
            }
            Ok(())
        }
        IntrospectionType::Enum(t) => {
            write_description(out, t.description.as_deref(), 0)?;
            writeln!(out, "enum {} {{", t.name)?;
            for value in &t.enum_values {
                write_description(out, value.description.as_deref(), 1)?;
                write!(out, "  {}", value.name)?;
                if value.is_deprecated {
                    write_deprecated(out, value.deprecation_reason.as_deref())?;
                }
                out.push('\n');
            }
            out.push('}');
            Ok(())
        }
        IntrospectionType::InputObject(t) => {
            write_description(out, t.description.as_deref(), 0)?;
            writeln!(out, "input {} {{", t.name)?;
            for field in &t.input_fields {
                write_description(out, field.description.as_deref(), 1)?;
                write!(out, "  ")?;
                write_input_value(out, field)?;
                out.push('\n');
            }
            out.push('}');
            Ok(())
        }
    }
}

fn write_implements(out: &mut String, interfaces: &[IntrospectionTypeRef]) -> fmt::Result {
    if interfaces.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();
    write!(out, " implements {}", names.join(" & "))
}

fn write_fields(out: &mut String, fields: &[IntrospectionField]) -> fmt::Result {
    // `type Foo {}` is not valid SDL; a field-less type omits the braces.
    if fields.is_empty() {
        return Ok(());
    }
    out.push_str(" {\n");
    for field in fields {
        write_description(out, field.description.as_deref(), 1)?;
        write!(out, "  {}", field.name)?;
        write_arguments(out, &field.args)?;
        write!(out, ": {}", field.type_ref)?;
        if field.is_deprecated {
            write_deprecated(out, field.deprecation_reason.as_deref())?;
        }
        out.push('\n');
    }
    out.push('}');
    Ok(())
}

fn write_arguments(out: &mut String, args: &[IntrospectionInputValue]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_input_value(out, arg)?;
    }
    out.push(')');
    Ok(())
}

fn write_input_value(out: &mut String, value: &IntrospectionInputValue) -> fmt::Result {
    write!(out, "{}: {}", value.name, value.type_ref)?;
    if let Some(default) = &value.default_value {
        write!(out, " = {default}")?;
    }
    Ok(())
}

fn write_deprecated(out: &mut String, reason: Option<&str>) -> fmt::Result {
    match reason {
        Some(reason) => write!(out, " @deprecated(reason: \"{}\")", escape_string(reason)),
        None => write!(out, " @deprecated"),
    }
}

fn write_description(out: &mut String, description: Option<&str>, indent: usize) -> fmt::Result {
    let Some(desc) = description else {
        return Ok(());
    };
    let indent_str = "  ".repeat(indent);
    let block_safe = desc
        .chars()
        .all(|c| !c.is_control() || c == '\n' || c == '\t');
    if desc.contains('\n') && block_safe {
        let block = desc.replace("\"\"\"", "\\\"\"\"");
        writeln!(out, "{indent_str}\"\"\"\n{block}\n{indent_str}\"\"\"")
    } else {
        writeln!(out, "{indent_str}\"{}\"", escape_string(desc))
    }
}

fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push('\t'),
            c if u32::from(c) < 0x20 => {
                let _ = write!(escaped, "\\u{:04X}", u32::from(c));
            }
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_introspection;
    use serde_json::json;

    fn type_ref(name: &str, kind: &str) -> serde_json::Value {
        json!({ "kind": kind, "name": name, "ofType": null })
    }

    fn non_null(inner: serde_json::Value) -> serde_json::Value {
        json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
    }

    fn field(name: &str, ty: serde_json::Value) -> serde_json::Value {
        json!({
            "name": name,
            "description": null,
            "args": [],
            "type": ty,
            "isDeprecated": false,
            "deprecationReason": null
        })
    }

    fn sample() -> IntrospectionResponse {
        parse_introspection(&json!({
            "data": { "__schema": {
                "queryType": { "name": "Root" },
                "mutationType": null,
                "subscriptionType": null,
                "types": [
                    { "kind": "SCALAR", "name": "ID", "description": null },
                    { "kind": "SCALAR", "name": "DateTime", "description": "An ISO-8601 timestamp" },
                    {
                        "kind": "OBJECT",
                        "name": "Root",
                        "description": null,
                        "fields": [
                            field("node", type_ref("Node", "INTERFACE")),
                            {
                                "name": "legacy",
                                "description": null,
                                "args": [{
                                    "name": "limit",
                                    "description": null,
                                    "type": type_ref("Int", "SCALAR"),
                                    "defaultValue": "10"
                                }],
                                "type": type_ref("DateTime", "SCALAR"),
                                "isDeprecated": true,
                                "deprecationReason": "Use \"node\""
                            }
                        ],
                        "interfaces": []
                    },
                    {
                        "kind": "INTERFACE",
                        "name": "Node",
                        "description": null,
                        "fields": [field("id", non_null(type_ref("ID", "SCALAR")))],
                        "interfaces": null,
                        "possibleTypes": [{ "kind": "OBJECT", "name": "Root", "ofType": null }]
                    },
                    {
                        "kind": "ENUM",
                        "name": "Color",
                        "description": null,
                        "enumValues": [
                            { "name": "RED", "description": null, "isDeprecated": false, "deprecationReason": null },
                            { "name": "BLUE", "description": null, "isDeprecated": true, "deprecationReason": null }
                        ]
                    },
                    {
                        "kind": "OBJECT",
                        "name": "__Type",
                        "description": null,
                        "fields": [],
                        "interfaces": []
                    }
                ],
                "directives": [
                    { "name": "skip", "description": null, "locations": ["FIELD"], "args": [] },
                    {
                        "name": "cached",
                        "description": null,
                        "locations": ["FIELD_DEFINITION", "OBJECT"],
                        "args": [{
                            "name": "ttl",
                            "description": null,
                            "type": non_null(type_ref("Int", "SCALAR")),
                            "defaultValue": null
                        }]
                    }
                ]
            } }
        }))
        .unwrap()
    }

    #[test]
    fn test_sdl_rendering() {
        insta::assert_snapshot!(introspection_to_sdl(&sample()), @r#"
        schema {
          query: Root
        }

        directive @cached(ttl: Int!) on FIELD_DEFINITION | OBJECT

        "An ISO-8601 timestamp"
        scalar DateTime

        type Root {
          node: Node
          legacy(limit: Int = 10): DateTime @deprecated(reason: "Use \"node\"")
        }

        interface Node {
          id: ID!
        }

        enum Color {
          RED
          BLUE @deprecated
        }
        "#);
    }

    #[test]
    fn test_builtins_are_skipped() {
        let sdl = introspection_to_sdl(&sample());
        assert!(!sdl.contains("scalar ID"));
        assert!(!sdl.contains("__Type"));
        assert!(!sdl.contains("directive @skip"));
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("hello"), "hello");
        assert_eq!(escape_string("hello \"world\""), "hello \\\"world\\\"");
        assert_eq!(escape_string("hello\nworld"), "hello\\nworld");
        assert_eq!(escape_string("C:\\path"), "C:\\\\path");
    }

    #[test]
    fn test_escape_control_characters() {
        assert_eq!(escape_string("a\rb"), "a\\rb");
        assert_eq!(escape_string("a\u{1}b"), "a\\u0001b");
        assert_eq!(escape_string("a\tb"), "a\tb");
    }

    #[test]
    fn test_description_with_carriage_return_stays_single_line() {
        let mut out = String::new();
        write_description(&mut out, Some("first\r\nsecond"), 0).unwrap();
        assert_eq!(out, "\"first\\r\\nsecond\"\n");

        let mut out = String::new();
        write_description(&mut out, Some("a\rb"), 1).unwrap();
        assert_eq!(out, "  \"a\\rb\"\n");
    }

    fn roots_schema(mutation_type: serde_json::Value) -> IntrospectionResponse {
        parse_introspection(&json!({
            "data": { "__schema": {
                "queryType": { "name": "Query" },
                "mutationType": mutation_type,
                "subscriptionType": null,
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Query",
                        "description": null,
                        "fields": [field("hello", type_ref("String", "SCALAR"))],
                        "interfaces": []
                    },
                    {
                        "kind": "OBJECT",
                        "name": "Mutation",
                        "description": null,
                        "fields": [field("touch", type_ref("String", "SCALAR"))],
                        "interfaces": []
                    }
                ],
                "directives": []
            } }
        }))
        .unwrap()
    }

    #[test]
    fn test_schema_block_for_type_named_like_an_absent_root() {
        let sdl = introspection_to_sdl(&roots_schema(serde_json::Value::Null));
        assert!(sdl.starts_with("schema {\n  query: Query\n}"));
        assert!(!sdl.contains("mutation:"));

        let sdl = introspection_to_sdl(&roots_schema(json!({ "name": "Mutation" })));
        assert!(!sdl.contains("schema {"));
    }
}
