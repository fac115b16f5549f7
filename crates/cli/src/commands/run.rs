use super::CommandContext;
use crate::exit_code::ExitCode;
use anyhow::{Context, Result};
use colored::Colorize;
use graphql_util::{ExecutionResult, RequestContext, Variables};
use serde_json::Value;
use std::time::Duration;

/// Executes a registered operation and prints the JSON result.
#[tracing::instrument(skip(ctx, variables, headers))]
pub fn run(
    ctx: &CommandContext,
    name: &str,
    variables: Option<&str>,
    headers: &[String],
    timeout: Option<u64>,
) -> Result<ExitCode> {
    let variables = parse_variables(variables)?;
    let request_context = request_context(headers, timeout)?;

    let (_, client) = ctx.client()?;
    let spinner = crate::progress::spinner(
        &format!("Running {name}..."),
        ctx.output.show_progress,
    );
    let result = client.call(name, &variables, &request_context);
    spinner.finish_and_clear();

    let rendered = serde_json::to_string_pretty(&result.to_json())
        .context("Failed to serialize result")?;
    println!("{rendered}");

    let code = exit_code(&result);
    if code != ExitCode::Success && ctx.output.show_info {
        for message in result.messages() {
            eprintln!("{} {message}", "error:".red().bold());
        }
    }
    Ok(code)
}

fn exit_code(result: &ExecutionResult) -> ExitCode {
    match result {
        ExecutionResult::Success { .. } => ExitCode::Success,
        ExecutionResult::Failure { .. } => ExitCode::OperationFailed,
        ExecutionResult::TransportFailure { .. } => ExitCode::TransportFailed,
    }
}

/// Parses `--variables`, which must be a JSON object.
fn parse_variables(raw: Option<&str>) -> Result<Variables> {
    let Some(raw) = raw else {
        return Ok(Variables::new());
    };
    match serde_json::from_str::<Value>(raw).context("Failed to parse --variables as JSON")? {
        Value::Object(variables) => Ok(variables),
        other => anyhow::bail!("--variables must be a JSON object, got: {other}"),
    }
}

fn request_context(headers: &[String], timeout: Option<u64>) -> Result<RequestContext> {
    let mut context = RequestContext::new();
    for header in headers {
        let (name, value) = parse_header(header).context("Failed to parse headers")?;
        context = context.with_header(name, value);
    }
    if let Some(seconds) = timeout {
        if seconds == 0 {
            anyhow::bail!("--timeout must be greater than zero");
        }
        context = context.with_timeout(Duration::from_secs(seconds));
    }
    Ok(context)
}

/// Parses a header string in "Name: Value" format.
fn parse_header(header: &str) -> Result<(String, String)> {
    let Some((name, value)) = header.split_once(':') else {
        anyhow::bail!("Invalid header format: '{header}'. Expected 'Header-Name: Header-Value'");
    };
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Header name cannot be empty");
    }
    Ok((name.to_string(), value.trim().to_string()))
}
