//! Resolution engine
//!
//! One owner loop holds the [`ResolutionState`]; manifest fetches run as
//! spawned tasks, at most `concurrency` at a time. Directories are claimed
//! when they are dispatched, in queue order, and results are consumed in
//! the same order, so every run over the same tree makes the same decisions
//! as a one-at-a-time traversal.

mod state;
mod worker;

use crate::submodule::{Located, fetch_file};
use crate::workspace::expand_members;
use crate::{
    DependencyFile, EcosystemVersions, Error, FetchConfig, FileSet, LOCKFILE, MANIFEST, Result,
    extract_path_dependencies,
};
use scout_meta::{DEFAULT_CHANNEL, ParsedManifest, WorkspaceMembers, extract_channel};
use scout_tree::{RemoteTree, RepoPath, TreeContext};
use state::{Candidate, ImplicitWorkspace, Origin, ResolutionState};
use std::sync::Arc;
use worker::{Fetched, InFlight};

/// Cargo configuration files, newest name first.
const CARGO_CONFIGS: [&str; 2] = [".cargo/config.toml", ".cargo/config"];

/// Resolves the manifests reachable from a root `Cargo.toml`.
///
/// # Example
///
/// ```
/// use scout_core::{FetchConfig, Resolver};
/// use scout_tree::{InMemoryTree, RepoPath, TreeContext};
/// use std::sync::Arc;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let context = TreeContext::new("github.com/gocardless/bump", "sha");
/// let tree = InMemoryTree::new()
///     .with_file(&context, "/Cargo.toml", "[dependencies]\ns3 = { path = \"src/s3\" }\n")
///     .with_file(&context, "/src/s3/Cargo.toml", "[package]\nname = \"s3\"\n");
///
/// let resolver = Resolver::new(Arc::new(tree), context, FetchConfig::default());
/// let files = resolver.resolve(&RepoPath::root()).await.unwrap();
///
/// assert_eq!(files.paths(), vec!["/Cargo.toml", "/src/s3/Cargo.toml"]);
/// assert!(files.files[1].support_file);
/// # });
/// ```
pub struct Resolver {
    tree: Arc<dyn RemoteTree>,
    context: TreeContext,
    config: FetchConfig,
}

impl Resolver {
    pub fn new(tree: Arc<dyn RemoteTree>, context: TreeContext, config: FetchConfig) -> Self {
        Self {
            tree,
            context,
            config: config.validated(),
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Resolve from the configured directory.
    pub async fn run(&self) -> Result<FileSet> {
        self.resolve(&self.config.directory).await
    }

    /// Resolve every manifest reachable from `root_directory/Cargo.toml`.
    pub async fn resolve(&self, root_directory: &RepoPath) -> Result<FileSet> {
        tracing::info!(
            context = %self.context,
            directory = %root_directory,
            concurrency = self.config.concurrency,
            "Resolving manifests"
        );

        let mut state = ResolutionState::new(root_directory.clone());
        let root = self.fetch_root(&mut state).await?;

        if self.config.lockfile {
            self.collect_lockfile(&mut state, &root).await?;
        }
        if self.config.cargo_config {
            self.collect_cargo_config(&mut state, &root).await?;
        }
        let channel = self.collect_toolchain(&mut state, &root).await?;

        self.drain(&mut state).await?;

        let files = state.finish()?;
        tracing::info!(
            files = files.len(),
            channel = %channel,
            "Resolution finished"
        );
        Ok(FileSet {
            files,
            ecosystem_versions: EcosystemVersions { cargo: channel },
        })
    }

    async fn fetch_root(&self, state: &mut ResolutionState) -> Result<Located> {
        let directory = state.root().clone();
        let Some(located) =
            fetch_file(self.tree.as_ref(), &self.context, &directory, MANIFEST).await?
        else {
            return Err(Error::FileNotFound {
                path: directory.join(MANIFEST),
            });
        };

        let manifest = ParsedManifest::parse(&located.content)
            .map_err(|e| Error::not_parseable(directory.join(MANIFEST), e))?;

        state.claim(&directory);
        state.mark_member(directory.clone());
        state.record_manifest(directory, located.content.clone(), manifest);
        Ok(located)
    }

    /// Fetch a file next to the root manifest, in whichever repository the
    /// root manifest was found.
    async fn fetch_beside_root(&self, root: &Located, name: &str) -> Result<Option<String>> {
        let path = root.directory.join(name);
        Ok(self.tree.fetch(&root.context, &path).await?)
    }

    async fn collect_lockfile(&self, state: &mut ResolutionState, root: &Located) -> Result<()> {
        if let Some(content) = self.fetch_beside_root(root, LOCKFILE).await? {
            let file = DependencyFile::new(state.root().clone(), LOCKFILE, content);
            state.collect_file(file);
        }
        Ok(())
    }

    async fn collect_cargo_config(&self, state: &mut ResolutionState, root: &Located) -> Result<()> {
        for name in CARGO_CONFIGS {
            if let Some(content) = self.fetch_beside_root(root, name).await? {
                let file = DependencyFile::new(state.root().clone(), name, content);
                state.collect_file(file.with_support(true));
                break;
            }
        }
        Ok(())
    }

    async fn collect_toolchain(&self, state: &mut ResolutionState, root: &Located) -> Result<String> {
        for kind in self.config.toolchain_precedence.order() {
            let name = kind.file_name();
            let Some(content) = self.fetch_beside_root(root, name).await? else {
                continue;
            };
            let channel = extract_channel(kind, &content)
                .map_err(|e| Error::not_parseable(state.root().join(name), e))?;
            tracing::debug!(file = name, channel = %channel, "Toolchain channel");

            let file = DependencyFile::new(state.root().clone(), name, content);
            state.collect_file(file.with_support(true));
            return Ok(channel);
        }
        Ok(DEFAULT_CHANNEL.to_string())
    }

    async fn drain(&self, state: &mut ResolutionState) -> Result<()> {
        let mut in_flight = InFlight::new(Arc::clone(&self.tree), self.context.clone());

        loop {
            while let Some(directory) = state.expansions.pop_front() {
                self.expand_workspace(state, &directory).await?;
            }

            while in_flight.len() < self.config.concurrency {
                let Some(front) = state.queue.front() else {
                    break;
                };
                // Its fate depends on a result that has not arrived yet.
                if in_flight.contains(&front.directory) {
                    break;
                }
                let Some(candidate) = state.queue.pop_front() else {
                    break;
                };
                if state.claim(&candidate.directory) {
                    tracing::debug!(
                        directory = %candidate.directory,
                        origin = ?candidate.origin,
                        "Claimed"
                    );
                    in_flight.spawn_for(candidate);
                } else {
                    state.revisit(&candidate)?;
                }
            }

            let Some((candidate, outcome)) = in_flight.next().await else {
                if state.queue.is_empty() && state.expansions.is_empty() {
                    return Ok(());
                }
                continue;
            };

            match outcome? {
                Fetched::Manifest { content, manifest } => {
                    state.record_manifest(candidate.directory, content, manifest);
                }
                Fetched::Missing => {
                    state.record_missing(candidate.directory, candidate.origin)?;
                }
            }
        }
    }

    async fn expand_workspace(&self, state: &mut ResolutionState, directory: &RepoPath) -> Result<()> {
        let Some(manifest) = state.start_expansion(directory) else {
            return Ok(());
        };
        if let Some(workspace) = &manifest.workspace {
            if workspace.members == WorkspaceMembers::Implicit {
                state.declare_implicit(ImplicitWorkspace::new(
                    directory.clone(),
                    &workspace.exclude,
                ));
            }
        }

        // Membership of an implicit workspace follows path dependencies.
        if let Some(implicit) = state.implicit_workspace_of(directory) {
            for candidate in extract_path_dependencies(&manifest, directory) {
                if implicit.admits(&candidate.directory) {
                    state.mark_member(candidate.directory);
                }
            }
        }

        let Some(workspace) = &manifest.workspace else {
            return Ok(());
        };
        if workspace.members == WorkspaceMembers::Implicit {
            return Ok(());
        }

        let members = expand_members(self.tree.as_ref(), &self.context, &manifest, directory).await?;
        for member in members {
            state.mark_member(member.clone());
            state.queue.push_back(Candidate {
                directory: member,
                origin: Origin::WorkspaceMember,
            });
        }
        Ok(())
    }
}
