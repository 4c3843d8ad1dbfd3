//! [`RemoteTree`] over local git object databases

use crate::{Error, Gitmodules, Result};
use async_trait::async_trait;
use git2::{ErrorCode, ObjectType, Repository, Tree};
use scout_tree::{DirectoryEntry, EntryKind, RemoteTree, RepoPath, RepositoryId, TreeContext};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Reads repository trees at pinned commits through `git2`.
///
/// Repositories are located by identity: explicitly registered paths win,
/// then `<mirror_root>/<identity>.git` and `<mirror_root>/<identity>`.
/// An identity that cannot be located behaves like an empty tree, which is
/// how an inaccessible submodule looks to a hosting API as well.
#[derive(Debug, Clone, Default)]
pub struct GitTree {
    repositories: HashMap<RepositoryId, PathBuf>,
    mirror_root: Option<PathBuf>,
}

impl GitTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the local git directory (bare or not) for a repository.
    pub fn with_repository(mut self, repository: impl Into<RepositoryId>, path: impl Into<PathBuf>) -> Self {
        self.repositories.insert(repository.into(), path.into());
        self
    }

    /// Look up unregistered repositories underneath `root`.
    pub fn with_mirror_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.mirror_root = Some(root.into());
        self
    }

    /// Where the object database for `repository` lives, if anywhere.
    pub fn locate(&self, repository: &RepositoryId) -> Option<PathBuf> {
        if let Some(path) = self.repositories.get(repository) {
            return Some(path.clone());
        }
        let root = self.mirror_root.as_ref()?;
        let bare = root.join(format!("{}.git", repository.as_str()));
        if bare.is_dir() {
            return Some(bare);
        }
        let plain = root.join(repository.as_str());
        plain.is_dir().then_some(plain)
    }

    async fn run<T, F>(&self, context: &TreeContext, path: &RepoPath, job: F) -> scout_tree::Result<Option<T>>
    where
        T: Send + 'static,
        F: FnOnce(&Repository) -> Result<Option<T>> + Send + 'static,
    {
        let Some(location) = self.locate(&context.repository) else {
            tracing::warn!(
                repository = %context.repository,
                "No local git database for repository"
            );
            return Ok(None);
        };
        if !location.is_dir() {
            return Err(scout_tree::Error::RepositoryUnavailable {
                repository: context.repository.clone(),
            });
        }

        let outcome = tokio::task::spawn_blocking(move || {
            let repo = Repository::open(&location)?;
            job(&repo)
        })
        .await
        .map_err(Error::from)
        .and_then(|result| result);

        outcome.map_err(|e| scout_tree::Error::transport(&context.repository, path, e.to_string()))
    }
}

#[async_trait]
impl RemoteTree for GitTree {
    async fn fetch(&self, context: &TreeContext, path: &RepoPath) -> scout_tree::Result<Option<String>> {
        tracing::debug!(context = %context, path = %path, "git fetch");
        let reference = context.reference.clone();
        let target = path.clone();
        self.run(context, path, move |repo| read_blob(repo, &reference, &target))
            .await
    }

    async fn list(
        &self,
        context: &TreeContext,
        path: &RepoPath,
    ) -> scout_tree::Result<Option<Vec<DirectoryEntry>>> {
        tracing::debug!(context = %context, path = %path, "git list");
        let repository = context.repository.clone();
        let reference = context.reference.clone();
        let target = path.clone();
        self.run(context, path, move |repo| {
            list_tree(repo, &repository, &reference, &target)
        })
        .await
    }
}

fn is_missing(e: &git2::Error) -> bool {
    matches!(
        e.code(),
        ErrorCode::NotFound | ErrorCode::InvalidSpec | ErrorCode::Ambiguous
    )
}

fn root_tree<'r>(repo: &'r Repository, reference: &str) -> Result<Option<Tree<'r>>> {
    match repo.revparse_single(reference) {
        Ok(object) => Ok(Some(object.peel_to_tree()?)),
        Err(e) if is_missing(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn entry_at<'r>(tree: &Tree<'r>, path: &RepoPath) -> Result<Option<git2::TreeEntry<'static>>> {
    match tree.get_path(Path::new(path.as_relative())) {
        Ok(entry) => Ok(Some(entry)),
        Err(e) if is_missing(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn read_blob(repo: &Repository, reference: &str, path: &RepoPath) -> Result<Option<String>> {
    if path.is_root() {
        return Ok(None);
    }
    let Some(root) = root_tree(repo, reference)? else {
        return Ok(None);
    };
    let Some(entry) = entry_at(&root, path)? else {
        return Ok(None);
    };
    if entry.kind() != Some(ObjectType::Blob) {
        return Ok(None);
    }
    let blob = repo.find_blob(entry.id())?;
    Ok(Some(String::from_utf8_lossy(blob.content()).into_owned()))
}

fn read_gitmodules(repo: &Repository, root: &Tree<'_>) -> Result<Gitmodules> {
    let Some(entry) = entry_at(root, &RepoPath::new(".gitmodules"))? else {
        return Ok(Gitmodules::default());
    };
    let blob = repo.find_blob(entry.id())?;
    Ok(Gitmodules::parse(&String::from_utf8_lossy(blob.content())))
}

fn list_tree(
    repo: &Repository,
    repository: &RepositoryId,
    reference: &str,
    path: &RepoPath,
) -> Result<Option<Vec<DirectoryEntry>>> {
    let Some(root) = root_tree(repo, reference)? else {
        return Ok(None);
    };

    let subtree;
    let dir = if path.is_root() {
        &root
    } else {
        match entry_at(&root, path)? {
            Some(entry) if entry.kind() == Some(ObjectType::Tree) => {
                subtree = repo.find_tree(entry.id())?;
                &subtree
            }
            _ => return Ok(None),
        }
    };

    let mut gitmodules: Option<Gitmodules> = None;
    let mut entries = Vec::with_capacity(dir.len());

    for entry in dir.iter() {
        let Some(name) = entry.name() else {
            continue;
        };
        let child = path.join(name);
        let kind = match entry.kind() {
            Some(ObjectType::Blob) => EntryKind::File,
            Some(ObjectType::Tree) => EntryKind::Directory,
            Some(ObjectType::Commit) => {
                if gitmodules.is_none() {
                    gitmodules = Some(read_gitmodules(repo, &root)?);
                }
                let url = gitmodules.as_ref().and_then(|m| m.url_for(&child));
                match url {
                    Some(url) => EntryKind::Submodule {
                        repository: repository.resolve_url(url),
                        reference: entry.id().to_string(),
                    },
                    None => {
                        tracing::warn!(
                            path = %child,
                            "Gitlink without a .gitmodules declaration"
                        );
                        continue;
                    }
                }
            }
            _ => continue,
        };
        entries.push(DirectoryEntry {
            name: name.to_string(),
            path: child,
            kind,
        });
    }

    Ok(Some(entries))
}
