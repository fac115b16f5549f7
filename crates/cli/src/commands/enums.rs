use super::CommandContext;
use crate::exit_code::ExitCode;
use anyhow::Result;
use std::collections::BTreeMap;

/// Prints every enum of the target schema with its values.
#[tracing::instrument(skip(ctx))]
pub fn run(ctx: &CommandContext) -> Result<ExitCode> {
    let (_, schema) = ctx.schema(false)?;
    let enums = schema.enums();

    if enums.is_empty() {
        if ctx.output.show_info {
            println!("No enums in schema");
        }
        return Ok(ExitCode::Success);
    }

    for line in format_enums(&enums) {
        println!("{line}");
    }
    Ok(ExitCode::Success)
}

fn format_enums(enums: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    enums
        .iter()
        .map(|(name, values)| format!("{name}: {}", values.join(", ")))
        .collect()
}
