//! Collected files and the resolution result

use scout_tree::RepoPath;
use serde::{Deserialize, Serialize};

/// Kind of a collected file. Only plain files are produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    #[default]
    File,
}

/// A fetched manifest, lockfile or auxiliary file.
///
/// Identity is the `(directory, name)` pair; a [`FileSet`] never holds two
/// files with the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyFile {
    /// Path of the file relative to `directory`, usually a bare file name
    pub name: String,
    /// Containing folder in the original repository, even when the content
    /// came from a submodule
    pub directory: RepoPath,
    pub content: String,
    /// Needed to resolve the graph but not a package of interest itself
    pub support_file: bool,
    #[serde(rename = "type")]
    pub file_type: FileType,
}

impl DependencyFile {
    pub fn new(directory: RepoPath, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory,
            content: content.into(),
            support_file: false,
            file_type: FileType::File,
        }
    }

    pub fn with_support(mut self, support_file: bool) -> Self {
        self.support_file = support_file;
        self
    }

    /// Full path of the file inside the repository.
    pub fn path(&self) -> RepoPath {
        self.directory.join(&self.name)
    }
}

/// Toolchain versions declared by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcosystemVersions {
    /// Toolchain channel, `"default"` when no toolchain file exists
    pub cargo: String,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
    /// Collected files, root manifest first
    pub files: Vec<DependencyFile>,
    pub ecosystem_versions: EcosystemVersions,
}

impl FileSet {
    /// Look up a file by its full repository path.
    pub fn get(&self, path: impl Into<RepoPath>) -> Option<&DependencyFile> {
        let path = path.into();
        self.files.iter().find(|f| f.path() == path)
    }

    /// Full paths of all collected files, in collection order.
    pub fn paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.path().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
