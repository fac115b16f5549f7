use crate::{ConfigError, GraphQLUtilConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
const CONFIG_FILES: &[&str] = &[
    ".graphql-util.yml",
    ".graphql-util.yaml",
    ".graphql-util.json",
    ".graphql-util.toml",
    "graphql-util.yml",
    "graphql-util.yaml",
    "graphql-util.json",
    "graphql-util.toml",
];

/// Find a config file by walking up the directory tree from the given start directory.
/// Returns the path to the config file if found.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::info!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a config from the specified path.
///
/// The format is detected from the file extension, and relative target paths
/// are resolved against the directory containing the config file.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<GraphQLUtilConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let mut config = load_config_from_str(&contents, path)?;

    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }

    tracing::info!(
        targets = config.target_count(),
        multi_target = config.is_multi_target(),
        "Config loaded successfully"
    );
    Ok(config)
}

/// Load a config from a string.
/// The path is used for error messages and format detection; paths inside the
/// config are returned exactly as written.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<GraphQLUtilConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    tracing::debug!(extension, "Detecting config format");

    let config = match extension {
        "yml" | "yaml" => parse_yaml(contents, path)?,
        "json" => parse_json(contents, path)?,
        "toml" => parse_toml(contents, path)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    validate_config(&config, path)?;
    Ok(config)
}

fn parse_yaml(contents: &str, path: &Path) -> Result<GraphQLUtilConfig> {
    serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("YAML parse error: {e}"),
    })
}

fn parse_json(contents: &str, path: &Path) -> Result<GraphQLUtilConfig> {
    serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("JSON parse error: {e}"),
    })
}

fn parse_toml(contents: &str, path: &Path) -> Result<GraphQLUtilConfig> {
    toml::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("TOML parse error: {e}"),
    })
}

#[tracing::instrument(skip(config, path), fields(path = %path.display(), targets = config.target_count()))]
fn validate_config(config: &GraphQLUtilConfig, path: &Path) -> Result<()> {
    if config.target_count() == 0 {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            message: "config defines no targets".to_string(),
        });
    }

    for (target_name, target) in config.targets() {
        tracing::trace!(name = target_name, "Validating target config");
        if target_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                message: "target names must not be empty".to_string(),
            });
        }
        target.validate().map_err(|message| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: format!("Target '{target_name}': {message}"),
        })?;
    }

    tracing::debug!("Config validation passed");
    Ok(())
}
