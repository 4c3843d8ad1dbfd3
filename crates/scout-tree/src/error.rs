//! Error types for scout-tree

use crate::{RepoPath, RepositoryId};

/// Result type for scout-tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by a remote tree implementation.
///
/// A missing file or directory is not an error: [`crate::RemoteTree`]
/// reports it as `Ok(None)`. These variants describe a tree that could not
/// answer at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read {path} from {repository}: {message}")]
    Transport {
        repository: RepositoryId,
        path: RepoPath,
        message: String,
    },

    #[error("Repository {repository} is not available")]
    RepositoryUnavailable { repository: RepositoryId },
}

impl Error {
    pub fn transport(
        repository: &RepositoryId,
        path: &RepoPath,
        message: impl Into<String>,
    ) -> Self {
        Self::Transport {
            repository: repository.clone(),
            path: path.clone(),
            message: message.into(),
        }
    }
}
