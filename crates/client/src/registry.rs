//! Named operations loaded from a directory of `.graphql` files.
//!
//! Every file in the directory contributes one operation named after the file:
//! `GetUser.graphql` is callable as `getuser` and addressable by its constant
//! `GETUSER`. Building the registry is all-or-nothing.

use crate::{ConfigurationError, OperationKind, ParsedDocument, ResolvedSchema, Result};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension every query file must carry.
pub const QUERY_FILE_EXTENSION: &str = "graphql";

/// Similarity above which an unknown name gets a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// One registered operation.
#[derive(Debug, Clone)]
pub struct OperationEntry {
    name: String,
    constant: String,
    document: ParsedDocument,
}

impl OperationEntry {
    /// Lower-case callable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upper-case constant name.
    #[must_use]
    pub fn constant(&self) -> &str {
        &self.constant
    }

    #[must_use]
    pub fn file(&self) -> &Path {
        self.document.path()
    }

    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.document.kind()
    }

    #[must_use]
    pub fn document(&self) -> &ParsedDocument {
        &self.document
    }
}

/// Immutable mapping from operation names to their documents.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    entries: Vec<OperationEntry>,
    index: HashMap<String, usize>,
}

impl OperationRegistry {
    /// Parses every file of `dir` against `schema`.
    ///
    /// Files are visited in name order and the first bad one aborts the build:
    /// an entry that is not a `.graphql` file, a file name that is not a valid
    /// identifier, two files with the same name up to case, or a document that
    /// fails to parse or validate.
    #[tracing::instrument(skip(schema), fields(dir = %dir.display()))]
    pub fn build(schema: &ResolvedSchema, dir: &Path) -> Result<Self> {
        let mut files = list_dir(dir)?;
        files.sort();

        let mut registry = Self::default();
        for file in files {
            let constant = operation_name(&file)?.to_ascii_uppercase();
            if let Some(existing) = registry.get(&constant) {
                return Err(ConfigurationError::NameCollision {
                    name: constant,
                    first: existing.file().to_path_buf(),
                    second: file,
                }
                .into());
            }

            let document = ParsedDocument::read(schema, &file)?;
            registry.insert(OperationEntry {
                name: constant.to_ascii_lowercase(),
                constant,
                document,
            });
        }

        tracing::info!(operations = registry.len(), "Registered operations");
        Ok(registry)
    }

    fn insert(&mut self, entry: OperationEntry) {
        let position = self.entries.len();
        self.index.insert(entry.name.clone(), position);
        self.index.insert(entry.constant.clone(), position);
        tracing::debug!(name = %entry.name, file = %entry.file().display(), "Registered operation");
        self.entries.push(entry);
    }

    /// Looks up an operation by its callable or constant name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OperationEntry> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in file name order.
    pub fn iter(&self) -> impl Iterator<Item = &OperationEntry> {
        self.entries.iter()
    }

    /// Callable names in file name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(OperationEntry::name)
    }

    /// The registered callable name closest to `name`, if any is close enough.
    #[must_use]
    pub fn suggest(&self, name: &str) -> Option<&str> {
        let wanted = name.to_ascii_lowercase();
        self.names()
            .map(|candidate| (candidate, strsim::jaro_winkler(&wanted, candidate)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate)
    }
}

impl<'a> IntoIterator for &'a OperationRegistry {
    type Item = &'a OperationEntry;
    type IntoIter = std::slice::Iter<'a, OperationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let unreadable = |source| ConfigurationError::QueriesDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        files.push(entry.map_err(unreadable)?.path());
    }
    Ok(files)
}

/// Derives the operation name from a query file path.
fn operation_name(file: &Path) -> Result<&str> {
    let is_query_file =
        file.is_file() && file.extension() == Some(OsStr::new(QUERY_FILE_EXTENSION));
    if !is_query_file {
        return Err(ConfigurationError::InvalidExtension {
            file: file.to_path_buf(),
        }
        .into());
    }

    let stem = file.file_stem().and_then(OsStr::to_str).unwrap_or_default();
    if !is_identifier(stem) {
        return Err(ConfigurationError::InvalidOperationName {
            file: file.to_path_buf(),
            name: stem.to_string(),
        }
        .into());
    }
    Ok(stem)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("GetUser"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("user2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2fa"));
        assert!(!is_identifier("get-user"));
        assert!(!is_identifier("get user"));
        assert!(!is_identifier("usér"));
    }

    #[test]
    fn test_operation_name_requires_graphql_file() {
        let dir = tempfile::tempdir().unwrap();
        let query = dir.path().join("GetUser.graphql");
        let text = dir.path().join("notes.txt");
        let nested = dir.path().join("nested.graphql");
        fs::write(&query, "{ viewer { id } }").unwrap();
        fs::write(&text, "").unwrap();
        fs::create_dir(&nested).unwrap();

        assert_eq!(operation_name(&query).unwrap(), "GetUser");
        for bad in [text, nested] {
            let err = operation_name(&bad).unwrap_err();
            assert!(matches!(
                err,
                crate::Error::Configuration(ConfigurationError::InvalidExtension { ref file }) if *file == bad
            ));
        }
    }

    #[test]
    fn test_operation_name_rejects_non_identifiers() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("get-user.graphql");
        fs::write(&file, "").unwrap();

        let err = operation_name(&file).unwrap_err();
        assert!(err.to_string().contains("get-user"));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_dir(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Configuration(ConfigurationError::QueriesDirectory { .. })
        ));
    }
}
