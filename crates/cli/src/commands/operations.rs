use super::CommandContext;
use crate::exit_code::ExitCode;
use anyhow::Result;
use colored::Colorize;
use graphql_util::OperationRegistry;
use std::path::Path;

/// Lists the operations registered for the selected target.
#[tracing::instrument(skip(ctx))]
pub fn run(ctx: &CommandContext) -> Result<ExitCode> {
    let (target, client) = ctx.client()?;
    let operations = client.operations();

    if operations.is_empty() {
        if ctx.output.show_info {
            println!(
                "No operations found in {}",
                target.queries_dir().display().to_string().cyan()
            );
        }
        return Ok(ExitCode::Success);
    }

    for line in format_operations(operations, &target.queries_dir()) {
        println!("{line}");
    }
    if ctx.output.show_info {
        println!();
        println!("{} operation(s)", operations.len().to_string().bold());
    }
    Ok(ExitCode::Success)
}

fn format_operations(operations: &OperationRegistry, queries_dir: &Path) -> Vec<String> {
    let width = operations
        .names()
        .map(str::len)
        .max()
        .unwrap_or_default();

    operations
        .iter()
        .map(|entry| {
            let file = entry.file().strip_prefix(queries_dir).unwrap_or(entry.file());
            format!(
                "{:<width$}  {:<8}  {}  {}",
                entry.name(),
                entry.kind().to_string(),
                entry.constant(),
                file.display()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_util::Client;
    use graphql_util_test_utils::{fixtures, MockTransport, TestProject};

    #[test]
    fn test_format_operations() {
        let project = TestProject::new()
            .with_query("Viewer", fixtures::VIEWER_QUERY)
            .with_query("UpdateName", fixtures::UPDATE_NAME_MUTATION)
            .with_schema_artifact();
        let client =
            Client::configure_with_transport(&project.target_config(), MockTransport::new()).unwrap();

        let lines = format_operations(client.operations(), &project.queries_dir());
        assert_eq!(
            lines,
            vec![
                "updatename  mutation  UPDATENAME  UpdateName.graphql".to_string(),
                "viewer      query     VIEWER  Viewer.graphql".to_string(),
            ]
        );
    }
}
