//! In-memory tree snapshots
//!
//! Used by tests and fixtures to describe a remote repository (and the
//! repositories its submodules point at) without any transport.

use crate::{DirectoryEntry, Error, RemoteTree, RepoPath, Result, TreeContext};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

/// A call recorded by [`InMemoryTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Fetch(TreeContext, RepoPath),
    List(TreeContext, RepoPath),
}

#[derive(Debug, Default)]
struct Snapshot {
    files: BTreeMap<RepoPath, String>,
    submodules: BTreeMap<RepoPath, TreeContext>,
}

impl Snapshot {
    fn children(&self, dir: &RepoPath) -> BTreeMap<String, DirectoryEntry> {
        let mut children = BTreeMap::new();

        let paths = self
            .files
            .keys()
            .map(|p| (p, None))
            .chain(self.submodules.iter().map(|(p, t)| (p, Some(t))));

        for (path, submodule) in paths {
            if path == dir || !path.starts_with(dir) {
                continue;
            }
            let relative = path.relative_to(dir);
            let (name, nested) = match relative.split_once('/') {
                Some((first, _)) => (first, true),
                None => (relative.as_str(), false),
            };
            let child = dir.join(name);
            let entry = match (nested, submodule) {
                (true, _) => DirectoryEntry::directory(child),
                (false, Some(target)) => DirectoryEntry::submodule(child, target),
                (false, None) => DirectoryEntry::file(child),
            };
            children.entry(name.to_string()).or_insert(entry);
        }

        children
    }
}

/// A [`RemoteTree`] backed by in-memory snapshots, one per [`TreeContext`].
///
/// Directories exist implicitly whenever a file or submodule lives beneath
/// them. Every call is recorded so tests can assert on fetch counts.
#[derive(Debug, Default)]
pub struct InMemoryTree {
    snapshots: HashMap<TreeContext, Snapshot>,
    failures: HashSet<(TreeContext, RepoPath)>,
    requests: Mutex<Vec<Request>>,
}

impl InMemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the snapshot for `context`.
    pub fn with_file(
        mut self,
        context: &TreeContext,
        path: impl Into<RepoPath>,
        content: impl Into<String>,
    ) -> Self {
        self.insert_file(context, path, content);
        self
    }

    /// Add a submodule gitlink at `path` pointing at `target`.
    pub fn with_submodule(
        mut self,
        context: &TreeContext,
        path: impl Into<RepoPath>,
        target: &TreeContext,
    ) -> Self {
        self.snapshots
            .entry(context.clone())
            .or_default()
            .submodules
            .insert(path.into(), target.clone());
        self
    }

    /// Make every call for `path` fail with a transport error.
    pub fn with_failure(mut self, context: &TreeContext, path: impl Into<RepoPath>) -> Self {
        self.failures.insert((context.clone(), path.into()));
        self
    }

    pub fn insert_file(
        &mut self,
        context: &TreeContext,
        path: impl Into<RepoPath>,
        content: impl Into<String>,
    ) {
        self.snapshots
            .entry(context.clone())
            .or_default()
            .files
            .insert(path.into(), content.into());
    }

    /// All calls made so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times `path` was fetched under `context`.
    pub fn fetch_count(&self, context: &TreeContext, path: impl Into<RepoPath>) -> usize {
        let wanted = Request::Fetch(context.clone(), path.into());
        self.requests().iter().filter(|r| **r == wanted).count()
    }

    fn record(&self, request: Request) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }

    fn check_failure(&self, context: &TreeContext, path: &RepoPath) -> Result<()> {
        if self.failures.contains(&(context.clone(), path.clone())) {
            return Err(Error::transport(
                &context.repository,
                path,
                "injected transport failure",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteTree for InMemoryTree {
    async fn fetch(&self, context: &TreeContext, path: &RepoPath) -> Result<Option<String>> {
        self.record(Request::Fetch(context.clone(), path.clone()));
        self.check_failure(context, path)?;

        Ok(self
            .snapshots
            .get(context)
            .and_then(|snapshot| snapshot.files.get(path))
            .cloned())
    }

    async fn list(
        &self,
        context: &TreeContext,
        path: &RepoPath,
    ) -> Result<Option<Vec<DirectoryEntry>>> {
        self.record(Request::List(context.clone(), path.clone()));
        self.check_failure(context, path)?;

        let Some(snapshot) = self.snapshots.get(context) else {
            return Ok(None);
        };
        if snapshot.files.contains_key(path) || snapshot.submodules.contains_key(path) {
            return Ok(None);
        }

        let children = snapshot.children(path);
        if children.is_empty() && !path.is_root() {
            return Ok(None);
        }
        Ok(Some(children.into_values().collect()))
    }
}
