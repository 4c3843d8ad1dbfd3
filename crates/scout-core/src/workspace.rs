//! Workspace member expansion

use crate::submodule::list_dir;
use crate::{Error, MANIFEST, Result};
use indexmap::IndexSet;
use regex::Regex;
use scout_meta::{ParsedManifest, WorkspaceMembers};
use scout_tree::{DirectoryEntry, RemoteTree, RepoPath, TreeContext};
use std::collections::HashSet;

/// List the member directories declared by `manifest`'s `[workspace]` table.
///
/// Literal entries resolve against `declaring_directory`. Glob entries are
/// expanded one segment at a time, each wildcard segment costing one
/// directory listing per prefix; only directories and submodules match.
/// Prefixes inside a submodule are listed in the submodule's repository.
/// Excluded paths are removed by exact match. An implicit workspace lists
/// nothing: its only declared member is the declaring directory itself.
pub async fn expand_members(
    tree: &dyn RemoteTree,
    context: &TreeContext,
    manifest: &ParsedManifest,
    declaring_directory: &RepoPath,
) -> Result<Vec<RepoPath>> {
    let Some(workspace) = &manifest.workspace else {
        return Ok(Vec::new());
    };
    let WorkspaceMembers::Explicit(patterns) = &workspace.members else {
        return Ok(Vec::new());
    };

    let excluded: HashSet<RepoPath> = workspace
        .exclude
        .iter()
        .map(|e| declaring_directory.join(e))
        .collect();

    let mut members = IndexSet::new();
    for pattern in patterns {
        let expanded = if is_glob(pattern) {
            expand_glob(tree, context, declaring_directory, pattern).await?
        } else {
            vec![declaring_directory.join(pattern)]
        };
        members.extend(expanded.into_iter().filter(|m| !excluded.contains(m)));
    }

    tracing::debug!(
        directory = %declaring_directory,
        count = members.len(),
        "Expanded workspace members"
    );
    Ok(members.into_iter().collect())
}

/// Directories, and submodules which are directories once checked out.
fn is_listable(entry: &DirectoryEntry) -> bool {
    entry.is_directory() || entry.submodule_target().is_some()
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

async fn expand_glob(
    tree: &dyn RemoteTree,
    context: &TreeContext,
    declaring_directory: &RepoPath,
    pattern: &str,
) -> Result<Vec<RepoPath>> {
    let mut frontier = vec![declaring_directory.clone()];
    let mut listed = false;

    for segment in pattern.split(['/', '\\']).filter(|s| !s.is_empty()) {
        // Literal segments only need checking once a wildcard has fanned out.
        if !is_glob(segment) && (!listed || matches!(segment, "." | "..")) {
            frontier = frontier.iter().map(|dir| dir.join(segment)).collect();
            continue;
        }

        let matcher = if is_glob(segment) {
            segment_regex(segment)
        } else {
            Regex::new(&format!("^{}$", regex::escape(segment)))
        }
        .map_err(|e| Error::NotParseable {
            path: declaring_directory.join(MANIFEST),
            message: format!("invalid workspace member pattern {pattern:?}: {e}"),
        })?;
        listed = true;

        let mut next = Vec::new();
        for dir in &frontier {
            let Some(entries) = list_dir(tree, context, dir).await? else {
                tracing::warn!(
                    directory = %dir,
                    pattern,
                    "Workspace glob prefix does not exist"
                );
                continue;
            };
            next.extend(
                entries
                    .iter()
                    .filter(|e| is_listable(e) && matcher.is_match(&e.name))
                    .map(|e| dir.join(&e.name)),
            );
        }
        frontier = next;
    }

    Ok(frontier)
}

/// Translate one glob path segment into an anchored regex.
fn segment_regex(segment: &str) -> std::result::Result<Regex, regex::Error> {
    let mut out = String::from("^");
    let mut chars = segment.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let class: String = chars.clone().take_while(|&c| c != ']').collect();
                let closed = chars.clone().nth(class.chars().count()) == Some(']');
                if !closed || class.is_empty() {
                    out.push_str(r"\[");
                    continue;
                }
                for _ in 0..=class.chars().count() {
                    chars.next();
                }
                let (negated, body) = match class.strip_prefix(['!', '^']) {
                    Some(rest) => (true, rest),
                    None => (false, class.as_str()),
                };
                out.push('[');
                if negated {
                    out.push('^');
                }
                for c in body.chars() {
                    if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~') {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push(']');
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }

    out.push('$');
    Regex::new(&out)
}
