//! Path dependency candidates

use indexmap::IndexMap;
use scout_meta::ParsedManifest;
use scout_tree::RepoPath;

/// A directory a manifest points at through a `path` dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCandidate {
    pub directory: RepoPath,
    /// Every declaration of this directory also names a `git` or `registry`
    /// source, so a missing manifest there does not break the build.
    pub has_alternate_source: bool,
}

/// List the directories `manifest` depends on by path, resolved against the
/// directory the manifest lives in.
///
/// Order follows the manifest's scan order. A directory declared more than
/// once appears once, at its first position.
pub fn extract_path_dependencies(
    manifest: &ParsedManifest,
    declaring_directory: &RepoPath,
) -> Vec<PathCandidate> {
    let mut candidates: IndexMap<RepoPath, bool> = IndexMap::new();

    for dependency in &manifest.path_dependencies {
        let directory = declaring_directory.join(&dependency.path);
        candidates
            .entry(directory)
            .and_modify(|alternate| *alternate &= dependency.has_alternate_source)
            .or_insert(dependency.has_alternate_source);
    }

    candidates
        .into_iter()
        .map(|(directory, has_alternate_source)| PathCandidate {
            directory,
            has_alternate_source,
        })
        .collect()
}
