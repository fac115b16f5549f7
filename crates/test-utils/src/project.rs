//! Temporary project directories.
//!
//! A project is a scratch directory laid out the way a target expects it:
//! query files under `queries/` and an optional `schema.json` artifact.

use crate::fixtures;
use graphql_util::TargetConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for a scratch target directory.
///
/// # Example
///
/// ```ignore
/// use graphql_util_test_utils::{fixtures, TestProject};
///
/// let project = TestProject::new()
///     .with_query("Viewer", fixtures::VIEWER_QUERY)
///     .with_schema_artifact();
///
/// let client = Client::configure_with_transport(&project.target_config(), transport)?;
/// ```
pub struct TestProject {
    dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// An empty project with an empty `queries/` directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        fs::create_dir(dir.path().join("queries")).expect("failed to create queries dir");
        Self { dir }
    }

    /// Adds `queries/<name>.graphql`.
    pub fn with_query(self, name: &str, contents: &str) -> Self {
        self.with_file(&format!("queries/{name}.graphql"), contents)
    }

    /// Adds a file at `relative` inside the project.
    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&path, contents).expect("failed to write project file");
        self
    }

    /// Writes the fixture schema as an already cached artifact.
    pub fn with_schema_artifact(self) -> Self {
        let contents = serde_json::to_string_pretty(&fixtures::introspection_response())
            .expect("fixture serializes");
        self.with_file("schema.json", &contents)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn queries_dir(&self) -> PathBuf {
        self.dir.path().join("queries")
    }

    pub fn schema_path(&self) -> PathBuf {
        self.dir.path().join("schema.json")
    }

    /// Target rooted at this project, pointing at the fixture endpoint.
    pub fn target_config(&self) -> TargetConfig {
        TargetConfig::new(fixtures::ENDPOINT, self.dir.path())
    }
}
