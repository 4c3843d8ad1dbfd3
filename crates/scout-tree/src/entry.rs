//! Directory listing entries

use crate::{RepoPath, RepositoryId, TreeContext};
use serde::{Deserialize, Serialize};

/// What a directory listing entry points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
    /// A gitlink: another repository embedded at a pinned commit.
    Submodule {
        repository: RepositoryId,
        reference: String,
    },
}

impl EntryKind {
    /// Short lowercase label, matching hosting API vocabulary.
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "dir",
            EntryKind::Submodule { .. } => "submodule",
        }
    }
}

/// One row of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: RepoPath,
    pub kind: EntryKind,
}

impl DirectoryEntry {
    fn at(path: RepoPath, kind: EntryKind) -> Self {
        let name = path.file_name().unwrap_or_default().to_string();
        Self { name, path, kind }
    }

    pub fn file(path: impl Into<RepoPath>) -> Self {
        Self::at(path.into(), EntryKind::File)
    }

    pub fn directory(path: impl Into<RepoPath>) -> Self {
        Self::at(path.into(), EntryKind::Directory)
    }

    pub fn submodule(path: impl Into<RepoPath>, target: &TreeContext) -> Self {
        Self::at(
            path.into(),
            EntryKind::Submodule {
                repository: target.repository.clone(),
                reference: target.reference.clone(),
            },
        )
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    /// The repository and pinned reference a submodule entry points at.
    pub fn submodule_target(&self) -> Option<TreeContext> {
        match &self.kind {
            EntryKind::Submodule {
                repository,
                reference,
            } => Some(TreeContext::new(repository.clone(), reference.clone())),
            _ => None,
        }
    }
}
