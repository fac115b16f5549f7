pub mod enums;
pub mod operations;
pub mod run;
pub mod schema;

use crate::OutputOptions;
use anyhow::{Context, Result};
use graphql_util::{Client, Endpoint, HttpTransport, ResolvedSchema, SchemaCache};
use graphql_util_config::{find_config, load_config, TargetConfig, DEFAULT_TARGET};
use std::path::{Path, PathBuf};

/// Global options shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Option<PathBuf>,
    pub target: Option<String>,
    pub output: OutputOptions,
}

impl CommandContext {
    /// Loads the selected target from the config file.
    pub fn target_config(&self) -> Result<TargetConfig> {
        let current_dir = std::env::current_dir()?;
        load_target(
            self.config.as_deref(),
            self.target.as_deref(),
            &current_dir,
        )
    }

    /// Configures a client for the selected target.
    pub fn client(&self) -> Result<(TargetConfig, Client)> {
        let target = self.target_config()?;
        let spinner = crate::progress::spinner(
            &format!("Configuring client for {}...", target.endpoint),
            self.output.show_progress,
        );
        let client = Client::configure(&target);
        spinner.finish_and_clear();

        let client = client.with_context(|| {
            format!("Failed to configure client for {}", target.endpoint)
        })?;
        Ok((target, client))
    }

    /// Resolves the schema of the selected target without reading query files.
    pub fn schema(&self, refresh: bool) -> Result<(TargetConfig, ResolvedSchema)> {
        let target = self.target_config()?;
        let endpoint = Endpoint::from_config(&target)?;
        let transport = HttpTransport::from_config(&endpoint, &target)?;
        let cache = SchemaCache::new(target.schema_path());

        let spinner = crate::progress::spinner(
            &format!("Fetching schema from {}...", endpoint.url()),
            self.output.show_progress && (refresh || !cache.exists()),
        );
        let schema = if refresh {
            cache.refresh(&endpoint, &transport)
        } else {
            cache.resolve(&endpoint, &transport)
        };
        spinner.finish_and_clear();

        let schema = schema.with_context(|| format!("Failed to resolve schema for {}", endpoint.url()))?;
        Ok((target, schema))
    }
}

/// Finds (or reads) the config file and selects one target from it.
fn load_target(
    config_path: Option<&Path>,
    target_name: Option<&str>,
    current_dir: &Path,
) -> Result<TargetConfig> {
    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config(current_dir)
            .context("Failed to search for config")?
            .context("No graphql-util config file found. Use --config to specify one.")?,
    };

    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    let target_name = target_name.unwrap_or(DEFAULT_TARGET);
    let target = config.get_target(target_name).with_context(|| {
        if config.is_multi_target() {
            format!(
                "Target '{}' not found. Available targets: {}",
                target_name,
                config.target_names().join(", ")
            )
        } else {
            format!("Target '{target_name}' not found")
        }
    })?;

    tracing::debug!(target_name, endpoint = %target.endpoint, "Selected target");
    Ok(target.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_target_discovers_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".graphql-util.yml"),
            "endpoint: https://api.example.com/graphql\npath: graphql\n",
        )
        .unwrap();
        let nested = dir.path().join("src");
        fs::create_dir(&nested).unwrap();

        let target = load_target(None, None, &nested).unwrap();
        assert_eq!(target.endpoint, "https://api.example.com/graphql");
        assert_eq!(target.path, dir.path().join("graphql"));
    }

    #[test]
    fn test_load_target_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("custom.json");
        fs::write(
            &config,
            r#"{ "targets": {
                "github": { "endpoint": "https://api.github.com/graphql", "path": "gh" },
                "shop": { "endpoint": "https://shop.example.com/graphql", "path": "shop" }
            } }"#,
        )
        .unwrap();

        let target = load_target(Some(&config), Some("shop"), dir.path()).unwrap();
        assert_eq!(target.endpoint, "https://shop.example.com/graphql");

        let err = load_target(Some(&config), Some("missing"), dir.path()).unwrap_err();
        assert!(err.to_string().contains("Available targets: github, shop"));
    }

    #[test]
    fn test_load_target_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_target(None, None, dir.path()).unwrap_err();
        assert!(err.to_string().contains("No graphql-util config file found"));
    }
}
