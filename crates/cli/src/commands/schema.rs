//! Schema cache inspection.

use super::CommandContext;
use crate::exit_code::ExitCode;
use anyhow::Result;
use colored::Colorize;
use graphql_util::ResolvedSchema;
use graphql_util_introspect::IntrospectionType;

/// Resolves (or refreshes) the cached schema and prints a summary or the SDL.
#[tracing::instrument(skip(ctx))]
pub fn run(ctx: &CommandContext, refresh: bool, sdl: bool) -> Result<ExitCode> {
    let start_time = std::time::Instant::now();
    let (target, schema) = ctx.schema(refresh)?;

    if sdl {
        println!("{}", schema.sdl());
        return Ok(ExitCode::Success);
    }

    if ctx.output.show_info {
        let verb = if refresh { "refreshed" } else { "cached" };
        println!(
            "{} Schema {} at {}",
            "✓".green(),
            verb,
            target.schema_path().display().to_string().cyan()
        );
        println!("  {}", summary(&schema));
        println!("  {} {:.2}s", "⏱".dimmed(), start_time.elapsed().as_secs_f64());
    }
    Ok(ExitCode::Success)
}

fn summary(schema: &ResolvedSchema) -> String {
    let introspection = schema.introspection();
    let mut objects = 0;
    let mut inputs = 0;
    let mut enums = 0;
    let mut other = 0;
    for type_def in &introspection.types {
        if type_def.is_introspection_type() {
            continue;
        }
        match type_def {
            IntrospectionType::Object(_) => objects += 1,
            IntrospectionType::InputObject(_) => inputs += 1,
            IntrospectionType::Enum(_) => enums += 1,
            _ => other += 1,
        }
    }

    let roots = [
        introspection.query_type.as_ref(),
        introspection.mutation_type.as_ref(),
        introspection.subscription_type.as_ref(),
    ]
    .into_iter()
    .flatten()
    .map(|root| root.name.as_str())
    .collect::<Vec<_>>()
    .join(", ");

    format!(
        "{objects} object types, {inputs} input types, {enums} enums, {other} other types (roots: {roots})"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_util_introspect::parse_introspection;
    use graphql_util_test_utils::fixtures;

    #[test]
    fn test_summary() {
        let introspection = parse_introspection(&fixtures::introspection_response()).unwrap();
        let schema = ResolvedSchema::from_introspection(introspection).unwrap();

        assert_eq!(
            summary(&schema),
            "3 object types, 0 input types, 1 enums, 3 other types (roots: Query, Mutation)"
        );
    }
}
