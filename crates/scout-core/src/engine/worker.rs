//! Fetch jobs and the in-flight window

use super::state::Candidate;
use crate::submodule::fetch_file;
use crate::{Error, MANIFEST, Result};
use scout_meta::ParsedManifest;
use scout_tree::{RemoteTree, RepoPath, TreeContext};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// What a fetch job found at a candidate directory.
#[derive(Debug)]
pub(crate) enum Fetched {
    Manifest {
        content: String,
        manifest: ParsedManifest,
    },
    Missing,
}

/// Fetch and parse `directory/Cargo.toml`, following submodules.
pub(crate) async fn fetch_manifest(
    tree: &dyn RemoteTree,
    context: &TreeContext,
    directory: &RepoPath,
) -> Result<Fetched> {
    tracing::debug!(directory = %directory, "Fetching manifest");

    let Some(located) = fetch_file(tree, context, directory, MANIFEST).await? else {
        return Ok(Fetched::Missing);
    };
    let manifest = ParsedManifest::parse(&located.content)
        .map_err(|e| Error::not_parseable(directory.join(MANIFEST), e))?;

    Ok(Fetched::Manifest {
        content: located.content,
        manifest,
    })
}

/// Spawned fetch jobs, consumed in the order they were started.
///
/// Dropping the window aborts whatever is still running, so an early return
/// from the owner loop cancels outstanding work.
pub(crate) struct InFlight {
    tree: Arc<dyn RemoteTree>,
    context: TreeContext,
    jobs: VecDeque<(Candidate, JoinHandle<Result<Fetched>>)>,
}

impl InFlight {
    pub(crate) fn new(tree: Arc<dyn RemoteTree>, context: TreeContext) -> Self {
        Self {
            tree,
            context,
            jobs: VecDeque::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.jobs.len()
    }

    pub(crate) fn contains(&self, directory: &RepoPath) -> bool {
        self.jobs.iter().any(|(c, _)| c.directory == *directory)
    }

    /// Start fetching the manifest of a claimed candidate.
    pub(crate) fn spawn_for(&mut self, candidate: Candidate) {
        let tree = Arc::clone(&self.tree);
        let context = self.context.clone();
        let target = candidate.directory.clone();
        let handle =
            tokio::spawn(async move { fetch_manifest(tree.as_ref(), &context, &target).await });
        self.jobs.push_back((candidate, handle));
    }

    /// Wait for the oldest job.
    pub(crate) async fn next(&mut self) -> Option<(Candidate, Result<Fetched>)> {
        let (candidate, handle) = self.jobs.pop_front()?;
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(Error::Worker {
                message: format!("fetch of {} failed: {}", candidate.directory, e),
            }),
        };
        Some((candidate, outcome))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        for (_, handle) in &self.jobs {
            handle.abort();
        }
    }
}
