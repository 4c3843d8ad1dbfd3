//! The remote tree trait consumed by the resolver

use crate::{DirectoryEntry, RepoPath, Result, TreeContext};
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only access to a repository tree at a pinned reference.
///
/// Implementations own transport concerns (authentication, retries). A
/// missing path is a normal answer (`Ok(None)`); `Err` means the tree could
/// not answer and aborts whatever resolution asked.
#[async_trait]
pub trait RemoteTree: Send + Sync {
    /// Fetch the content of the file at `path`.
    ///
    /// Returns `Ok(None)` when nothing exists at `path` or it is not a
    /// regular file (a directory or a submodule gitlink).
    async fn fetch(&self, context: &TreeContext, path: &RepoPath) -> Result<Option<String>>;

    /// List the direct children of the directory at `path`.
    ///
    /// Returns `Ok(None)` when `path` does not exist or is not a directory.
    async fn list(
        &self,
        context: &TreeContext,
        path: &RepoPath,
    ) -> Result<Option<Vec<DirectoryEntry>>>;
}

#[async_trait]
impl<T: RemoteTree + ?Sized> RemoteTree for Arc<T> {
    async fn fetch(&self, context: &TreeContext, path: &RepoPath) -> Result<Option<String>> {
        (**self).fetch(context, path).await
    }

    async fn list(
        &self,
        context: &TreeContext,
        path: &RepoPath,
    ) -> Result<Option<Vec<DirectoryEntry>>> {
        (**self).list(context, path).await
    }
}
