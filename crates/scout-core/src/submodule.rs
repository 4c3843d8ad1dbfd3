//! Submodule redirects
//!
//! A plain fetch below a gitlink finds nothing: the content lives in another
//! repository at the commit the gitlink pins. These helpers find the gitlink
//! and retarget the fetch.

use crate::Result;
use scout_tree::{DirectoryEntry, RemoteTree, RepoPath, TreeContext};

/// Nested submodules followed before giving up.
const MAX_DEPTH: usize = 8;

/// Where a directory really lives when it sits inside a submodule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmoduleRedirect {
    /// The submodule repository at its pinned commit
    pub context: TreeContext,
    /// The directory inside the submodule repository
    pub directory: RepoPath,
}

/// A file found at a directory, possibly through submodules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Context the file was read from
    pub context: TreeContext,
    /// Directory of the file inside that context
    pub directory: RepoPath,
    pub content: String,
}

/// Repository and pinned reference of a submodule listing entry.
pub fn resolve_submodule(entry: &DirectoryEntry) -> Option<TreeContext> {
    entry.submodule_target()
}

/// Find the submodule that contains `directory`, if any.
///
/// Walks up from `directory`, listing each parent until one exists in
/// `context`. The first existing parent is conclusive: either the child on
/// the way down is a submodule entry, or nothing on this path is.
pub async fn locate(
    tree: &dyn RemoteTree,
    context: &TreeContext,
    directory: &RepoPath,
) -> Result<Option<SubmoduleRedirect>> {
    let mut current = directory.clone();

    while let Some(parent) = current.parent() {
        let Some(entries) = tree.list(context, &parent).await? else {
            current = parent;
            continue;
        };

        let name = current.file_name().unwrap_or_default();
        let redirect = entries
            .iter()
            .find(|e| e.name == name)
            .and_then(resolve_submodule)
            .map(|target| SubmoduleRedirect {
                context: target,
                directory: RepoPath::root().join(&directory.relative_to(&current)),
            });
        return Ok(redirect);
    }

    Ok(None)
}

/// Fetch `directory/name`, following submodules when the plain fetch misses.
pub async fn fetch_file(
    tree: &dyn RemoteTree,
    context: &TreeContext,
    directory: &RepoPath,
    name: &str,
) -> Result<Option<Located>> {
    let mut context = context.clone();
    let mut directory = directory.clone();

    for _ in 0..MAX_DEPTH {
        if let Some(content) = tree.fetch(&context, &directory.join(name)).await? {
            return Ok(Some(Located {
                context,
                directory,
                content,
            }));
        }

        let Some(redirect) = locate(tree, &context, &directory).await? else {
            return Ok(None);
        };
        tracing::debug!(
            from = %context,
            to = %redirect.context,
            directory = %redirect.directory,
            "Following submodule"
        );
        context = redirect.context;
        directory = redirect.directory;
    }

    tracing::warn!(
        directory = %directory,
        "Submodules nested too deeply"
    );
    Ok(None)
}

/// List `directory`, following submodules when it is not a directory of
/// `context`. Entry names are the same on either side of a gitlink.
pub async fn list_dir(
    tree: &dyn RemoteTree,
    context: &TreeContext,
    directory: &RepoPath,
) -> Result<Option<Vec<DirectoryEntry>>> {
    let mut context = context.clone();
    let mut directory = directory.clone();

    for _ in 0..MAX_DEPTH {
        if let Some(entries) = tree.list(&context, &directory).await? {
            return Ok(Some(entries));
        }

        let Some(redirect) = locate(tree, &context, &directory).await? else {
            return Ok(None);
        };
        tracing::debug!(
            from = %context,
            to = %redirect.context,
            directory = %redirect.directory,
            "Listing through submodule"
        );
        context = redirect.context;
        directory = redirect.directory;
    }

    tracing::warn!(
        directory = %directory,
        "Submodules nested too deeply"
    );
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scout_test_utils::{manifests, tree};
    use scout_tree::{InMemoryTree, Request};

    fn with_submodule() -> InMemoryTree {
        tree::with_root(manifests::WORKSPACE_ROOT)
            .with_submodule(&tree::bump(), "/lib/sub_crate", &tree::conduit())
            .with_file(&tree::conduit(), "/Cargo.toml", manifests::WORKSPACE_CHILD)
            .with_file(&tree::conduit(), "/nested/Cargo.toml", manifests::PLAIN)
    }

    #[tokio::test]
    async fn test_locate_submodule_root() {
        let tree = with_submodule();
        let redirect = locate(&tree, &tree::bump(), &RepoPath::new("/lib/sub_crate"))
            .await
            .unwrap();
        assert_eq!(
            redirect,
            Some(SubmoduleRedirect {
                context: tree::conduit(),
                directory: RepoPath::root(),
            })
        );
    }

    #[tokio::test]
    async fn test_locate_inside_submodule() {
        let tree = with_submodule();
        let redirect = locate(&tree, &tree::bump(), &RepoPath::new("/lib/sub_crate/nested"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(redirect.directory, RepoPath::new("/nested"));

        // `/lib/sub_crate` is not a listable directory, `/lib` is.
        assert_eq!(
            tree.requests(),
            vec![
                Request::List(tree::bump(), RepoPath::new("/lib/sub_crate")),
                Request::List(tree::bump(), RepoPath::new("/lib")),
            ]
        );
    }

    #[tokio::test]
    async fn test_locate_plain_directory() {
        let tree = with_submodule();
        let redirect = locate(&tree, &tree::bump(), &RepoPath::new("/src/s3"))
            .await
            .unwrap();
        assert!(redirect.is_none());
        assert!(
            locate(&tree, &tree::bump(), &RepoPath::root())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_fetch_through_submodule() {
        let tree = with_submodule();
        let located = fetch_file(&tree, &tree::bump(), &RepoPath::new("/lib/sub_crate"), "Cargo.toml")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(located.context, tree::conduit());
        assert_eq!(located.directory, RepoPath::root());
        assert_eq!(located.content, manifests::WORKSPACE_CHILD);
    }

    #[tokio::test]
    async fn test_fetch_through_nested_submodules() {
        let inner = TreeContext::new("github.com/example/inner", "abc123");
        let tree = InMemoryTree::new()
            .with_submodule(&tree::bump(), "/vendor/outer", &tree::conduit())
            .with_submodule(&tree::conduit(), "/deps/inner", &inner)
            .with_file(&inner, "/crate/Cargo.toml", manifests::PLAIN);

        let located = fetch_file(
            &tree,
            &tree::bump(),
            &RepoPath::new("/vendor/outer/deps/inner/crate"),
            "Cargo.toml",
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(located.context, inner);
        assert_eq!(located.directory, RepoPath::new("/crate"));
    }

    #[tokio::test]
    async fn test_fetch_missing_everywhere() {
        let tree = with_submodule();
        let located = fetch_file(&tree, &tree::bump(), &RepoPath::new("/lib/sub_crate/missing"), "Cargo.toml")
            .await
            .unwrap();
        assert!(located.is_none());
    }

    #[tokio::test]
    async fn test_list_inside_submodule() {
        let tree = with_submodule();
        let names = |entries: Option<Vec<DirectoryEntry>>| -> Vec<String> {
            entries.unwrap().into_iter().map(|e| e.name).collect()
        };

        let root = list_dir(&tree, &tree::bump(), &RepoPath::new("/lib/sub_crate"))
            .await
            .unwrap();
        assert_eq!(names(root), vec!["Cargo.toml", "nested"]);

        let nested = list_dir(&tree, &tree::bump(), &RepoPath::new("/lib/sub_crate/nested"))
            .await
            .unwrap();
        assert_eq!(names(nested), vec!["Cargo.toml"]);
    }

    #[tokio::test]
    async fn test_list_plain_and_missing_directories() {
        let tree = with_submodule();
        let lib = list_dir(&tree, &tree::bump(), &RepoPath::new("/lib"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lib.len(), 1);
        assert!(lib[0].submodule_target().is_some());

        assert!(
            list_dir(&tree, &tree::bump(), &RepoPath::new("/lib/sub_crate/missing"))
                .await
                .unwrap()
                .is_none()
        );
    }
}
