//! Mutable state of one resolution

use crate::path_deps::extract_path_dependencies;
use crate::{DependencyFile, Error, MANIFEST, Result};
use indexmap::IndexMap;
use scout_meta::ParsedManifest;
use scout_tree::RepoPath;
use std::collections::{HashMap, HashSet, VecDeque};

/// Why a directory was put on the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    PathDependency { has_alternate_source: bool },
    WorkspaceMember,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub(crate) directory: RepoPath,
    pub(crate) origin: Origin,
}

/// A `[workspace]` table without `members`: its path dependencies inside
/// `root` are members, transitively, unless excluded.
#[derive(Debug, Clone)]
pub(crate) struct ImplicitWorkspace {
    root: RepoPath,
    excluded: HashSet<RepoPath>,
}

impl ImplicitWorkspace {
    pub(crate) fn new(root: RepoPath, exclude: &[String]) -> Self {
        let excluded = exclude.iter().map(|e| root.join(e)).collect();
        Self { root, excluded }
    }

    /// Whether a path dependency at `directory` joins the workspace.
    pub(crate) fn admits(&self, directory: &RepoPath) -> bool {
        *directory != self.root
            && directory.starts_with(&self.root)
            && !self.excluded.contains(directory)
    }
}

/// Everything the owner loop knows. Only the owner touches it; fetch jobs
/// return their results to it.
#[derive(Debug)]
pub(crate) struct ResolutionState {
    root: RepoPath,
    claimed: HashSet<RepoPath>,
    /// Keyed by `(directory, name)`, in collection order
    collected: IndexMap<(RepoPath, String), DependencyFile>,
    manifests: HashMap<RepoPath, ParsedManifest>,
    members: HashSet<RepoPath>,
    expanded: HashSet<RepoPath>,
    failed: HashSet<RepoPath>,
    unreachable: Vec<String>,
    implicit: Vec<ImplicitWorkspace>,
    pub(crate) queue: VecDeque<Candidate>,
    /// Members whose workspace table still has to be expanded
    pub(crate) expansions: VecDeque<RepoPath>,
}

impl ResolutionState {
    pub(crate) fn new(root: RepoPath) -> Self {
        Self {
            root,
            claimed: HashSet::new(),
            collected: IndexMap::new(),
            manifests: HashMap::new(),
            members: HashSet::new(),
            expanded: HashSet::new(),
            failed: HashSet::new(),
            unreachable: Vec::new(),
            implicit: Vec::new(),
            queue: VecDeque::new(),
            expansions: VecDeque::new(),
        }
    }

    pub(crate) fn root(&self) -> &RepoPath {
        &self.root
    }

    /// Claim `directory` for fetching. `false` if it was claimed before.
    pub(crate) fn claim(&mut self, directory: &RepoPath) -> bool {
        self.claimed.insert(directory.clone())
    }

    /// Store a file that is not a manifest (lockfile, toolchain, config).
    pub(crate) fn collect_file(&mut self, file: DependencyFile) {
        let key = (file.directory.clone(), file.name.clone());
        self.collected.entry(key).or_insert(file);
    }

    /// Store a fetched manifest and queue its path dependencies.
    pub(crate) fn record_manifest(
        &mut self,
        directory: RepoPath,
        content: String,
        manifest: ParsedManifest,
    ) {
        for candidate in extract_path_dependencies(&manifest, &directory) {
            self.queue.push_back(Candidate {
                directory: candidate.directory,
                origin: Origin::PathDependency {
                    has_alternate_source: candidate.has_alternate_source,
                },
            });
        }

        self.collect_file(DependencyFile::new(directory.clone(), MANIFEST, content));
        self.manifests.insert(directory.clone(), manifest);
        if self.members.contains(&directory) {
            self.expansions.push_back(directory);
        }
    }

    /// Note that nothing could be fetched at `directory`.
    pub(crate) fn record_missing(&mut self, directory: RepoPath, origin: Origin) -> Result<()> {
        self.failed.insert(directory.clone());
        self.evaluate_failure(&directory, origin)
    }

    /// Handle a candidate whose directory was claimed earlier.
    ///
    /// A directory that failed before is judged again under the new origin,
    /// which may be stricter than the one it was first reached through.
    pub(crate) fn revisit(&mut self, candidate: &Candidate) -> Result<()> {
        if self.failed.contains(&candidate.directory) {
            return self.evaluate_failure(&candidate.directory, candidate.origin);
        }
        Ok(())
    }

    fn evaluate_failure(&mut self, directory: &RepoPath, origin: Origin) -> Result<()> {
        let path = directory.join(MANIFEST);
        match origin {
            Origin::WorkspaceMember => Err(Error::FileNotFound { path }),
            Origin::PathDependency {
                has_alternate_source: true,
            } => {
                tracing::debug!(
                    directory = %directory,
                    "Unreachable path dependency has an alternate source"
                );
                Ok(())
            }
            Origin::PathDependency {
                has_alternate_source: false,
            } => {
                let relative = path.relative_to(&self.root);
                if !self.unreachable.contains(&relative) {
                    tracing::warn!(path = %path, "Path dependency not reachable");
                    self.unreachable.push(relative);
                }
                Ok(())
            }
        }
    }

    /// Mark `directory` as a declared workspace member.
    ///
    /// A member that was already collected as a plain path dependency gets
    /// its own workspace table expanded now.
    pub(crate) fn mark_member(&mut self, directory: RepoPath) {
        if !self.members.insert(directory.clone()) {
            return;
        }
        if self.manifests.contains_key(&directory) && !self.expanded.contains(&directory) {
            self.expansions.push_back(directory);
        }
    }

    pub(crate) fn declare_implicit(&mut self, workspace: ImplicitWorkspace) {
        self.implicit.push(workspace);
    }

    /// The innermost implicit workspace `directory` belongs to, if any.
    pub(crate) fn implicit_workspace_of(&self, directory: &RepoPath) -> Option<ImplicitWorkspace> {
        self.implicit
            .iter()
            .filter(|ws| *directory == ws.root || ws.admits(directory))
            .max_by_key(|ws| ws.root.segments().count())
            .cloned()
    }

    /// Take the manifest of `directory` for expansion, once.
    pub(crate) fn start_expansion(&mut self, directory: &RepoPath) -> Option<ParsedManifest> {
        if !self.expanded.insert(directory.clone()) {
            return None;
        }
        self.manifests.get(directory).cloned()
    }

    /// Conclude the traversal: either the unreachable list, or every
    /// collected file with its final support flag.
    pub(crate) fn finish(self) -> Result<Vec<DependencyFile>> {
        if !self.unreachable.is_empty() {
            return Err(Error::PathDependenciesNotReachable {
                dependencies: self.unreachable,
            });
        }

        let root = self.root;
        let members = self.members;
        Ok(self
            .collected
            .into_values()
            .map(|file| {
                if file.name == MANIFEST {
                    let primary = file.directory == root || members.contains(&file.directory);
                    file.with_support(!primary)
                } else {
                    file
                }
            })
            .collect())
    }
}
