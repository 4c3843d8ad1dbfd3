//! End-to-end resolution over real git databases
//!
//! Exercises the complete flow: git tree at a pinned commit -> manifest
//! parsing -> workspace and path dependency traversal -> submodule redirect.

use pretty_assertions::assert_eq;
use scout_core::{Error, FetchConfig, FileSet, Resolver};
use scout_git::GitTree;
use scout_test_utils::git::GitFixture;
use scout_test_utils::manifests;
use scout_tree::{RepoPath, TreeContext};
use std::sync::Arc;

const BUMP: &str = "github.com/gocardless/bump";
const CONDUIT: &str = "github.com/runconduit/conduit";

/// A monorepo with glob members, an excluded crate, a path dependency
/// outside the workspace, a toolchain file and a submodule member.
struct Monorepo {
    bump: GitFixture,
    conduit: GitFixture,
    sha: String,
}

impl Monorepo {
    fn new() -> Self {
        let conduit = GitFixture::new();
        let pinned = conduit
            .commit()
            .file("Cargo.toml", manifests::WORKSPACE_CHILD)
            .write();

        let root = r#"
[package]
name = "bump"
version = "0.1.0"

[dependencies]
s3 = { path = "src/s3" }

[workspace]
members = ["packages/*", "lib/sub_crate"]
exclude = ["packages/legacy"]
"#;
        let s3 = r#"
[package]
name = "s3"
version = "0.1.0"

[dependencies]
legacy = { path = "../../packages/legacy" }
"#;

        let bump = GitFixture::new();
        let sha = bump
            .commit()
            .file("Cargo.toml", root)
            .file("Cargo.lock", manifests::LOCKFILE)
            .file("rust-toolchain.toml", "[toolchain]\nchannel = \"1.72.0\"\n")
            .file(".cargo/config.toml", "[build]\nrustflags = []\n")
            .file("src/s3/Cargo.toml", s3)
            .file("packages/sub_crate/Cargo.toml", manifests::WORKSPACE_CHILD)
            .file("packages/sub_crate2/Cargo.toml", manifests::WORKSPACE_CHILD2)
            .file("packages/legacy/Cargo.toml", manifests::EXCLUDED_PACKAGE)
            .file("packages/README.md", "# packages")
            .submodule("lib/sub_crate", "../../runconduit/conduit.git", &pinned)
            .write();

        Self { bump, conduit, sha }
    }

    fn tree(&self) -> GitTree {
        GitTree::new()
            .with_repository(BUMP, self.bump.path())
            .with_repository(CONDUIT, self.conduit.path())
    }

    async fn resolve(&self, config: FetchConfig) -> scout_core::Result<FileSet> {
        let context = TreeContext::new(BUMP, self.sha.clone());
        Resolver::new(Arc::new(self.tree()), context, config).run().await
    }
}

fn summary(set: &FileSet) -> Vec<(String, bool)> {
    set.files
        .iter()
        .map(|f| (f.path().to_string(), f.support_file))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_monorepo_resolution() {
    let repo = Monorepo::new();
    let set = repo.resolve(FetchConfig::default()).await.unwrap();

    assert_eq!(
        summary(&set),
        vec![
            ("/Cargo.toml".to_string(), false),
            ("/Cargo.lock".to_string(), false),
            ("/.cargo/config.toml".to_string(), true),
            ("/rust-toolchain.toml".to_string(), true),
            ("/src/s3/Cargo.toml".to_string(), true),
            ("/packages/sub_crate/Cargo.toml".to_string(), false),
            ("/packages/sub_crate2/Cargo.toml".to_string(), false),
            ("/lib/sub_crate/Cargo.toml".to_string(), false),
            ("/packages/legacy/Cargo.toml".to_string(), true),
        ]
    );
    assert_eq!(set.ecosystem_versions.cargo, "1.72.0");

    let submodule = set.get("/lib/sub_crate/Cargo.toml").unwrap();
    assert_eq!(submodule.directory, RepoPath::new("/lib/sub_crate"));
    assert_eq!(submodule.content, manifests::WORKSPACE_CHILD);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sequential_and_parallel_agree() {
    let repo = Monorepo::new();
    let sequential = repo
        .resolve(FetchConfig::default().with_concurrency(1))
        .await
        .unwrap();
    let parallel = repo
        .resolve(FetchConfig::default().with_concurrency(8))
        .await
        .unwrap();
    assert_eq!(sequential, parallel);
}

#[tokio::test]
async fn test_nested_directory_resolution() {
    let repo = Monorepo::new();
    let set = repo
        .resolve(FetchConfig::default().with_directory("/packages/sub_crate2"))
        .await
        .unwrap();

    assert_eq!(
        summary(&set),
        vec![
            ("/packages/sub_crate2/Cargo.toml".to_string(), false),
            ("/packages/sub_crate/Cargo.toml".to_string(), true),
        ]
    );
    assert_eq!(set.ecosystem_versions.cargo, "default");
}

#[tokio::test]
async fn test_missing_submodule_repository_is_fatal_for_member() {
    let repo = Monorepo::new();
    let context = TreeContext::new(BUMP, repo.sha.clone());
    let tree = GitTree::new().with_repository(BUMP, repo.bump.path());

    let result = Resolver::new(Arc::new(tree), context, FetchConfig::default())
        .run()
        .await;
    match result {
        Err(Error::FileNotFound { path }) => {
            assert_eq!(path.as_str(), "/lib/sub_crate/Cargo.toml")
        }
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_json_output_shape() {
    let repo = Monorepo::new();
    let set = repo.resolve(FetchConfig::default()).await.unwrap();
    let json = serde_json::to_value(&set).unwrap();

    assert_eq!(json["files"][0]["name"], "Cargo.toml");
    assert_eq!(json["files"][0]["directory"], "/");
    assert_eq!(json["files"][0]["type"], "file");
    assert_eq!(json["ecosystem_versions"]["cargo"], "1.72.0");
}

#[test]
fn test_parsed_manifest_feeds_path_candidates() {
    let manifest = scout_meta::ParsedManifest::parse(manifests::WORKSPACE_CHILD2).unwrap();
    let candidates =
        scout_core::extract_path_dependencies(&manifest, &RepoPath::new("/packages/sub_crate2"));
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].directory, RepoPath::new("/packages/sub_crate"));
}
