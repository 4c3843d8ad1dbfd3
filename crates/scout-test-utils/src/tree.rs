//! In-memory remote trees.

use scout_tree::{InMemoryTree, TreeContext};

/// Context of the repository under test.
pub fn bump() -> TreeContext {
    TreeContext::new("github.com/gocardless/bump", "sha")
}

/// Context of the repository the `lib/sub_crate` submodule points at.
pub fn conduit() -> TreeContext {
    TreeContext::new(
        "github.com/runconduit/conduit",
        "453df4efd57f5e8958adf17d728520bd585c82c9",
    )
}

/// A tree for [`bump`] containing only `/Cargo.toml`.
pub fn with_root(manifest: &str) -> InMemoryTree {
    InMemoryTree::new().with_file(&bump(), "/Cargo.toml", manifest)
}

/// Add `<dir>/Cargo.toml` to the [`bump`] snapshot.
pub fn with_manifest(tree: InMemoryTree, dir: &str, manifest: &str) -> InMemoryTree {
    let path = format!("{}/Cargo.toml", dir.trim_end_matches('/'));
    tree.with_file(&bump(), path.as_str(), manifest)
}
